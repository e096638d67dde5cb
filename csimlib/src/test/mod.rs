mod cache;
mod trace;
