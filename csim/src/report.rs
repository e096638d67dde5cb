use std::io::{self, Write};
use csimlib::cache::Cache;
use csimlib::stats::Outcome;
use csimlib::trace::AccessRecord;

/// Which per-access reports to print while replaying
#[derive(Debug, Default, Copy, Clone)]
pub struct Reports {
    pub verbose: bool,
    pub diagnostics: bool,
    pub state: bool,
}

impl Reports {
    pub fn any(&self) -> bool {
        self.verbose || self.diagnostics || self.state
    }

    /// Prints the enabled reports for one access
    pub fn write<W: Write>(&self, out: &mut W, record: &AccessRecord, outcome: &Outcome, cache: &Cache) -> io::Result<()> {
        if self.verbose {
            write_access(out, record, outcome)?;
        }
        if self.diagnostics {
            write_diagnostics(out, record, outcome, cache)?;
        }
        if self.state {
            write_cache(out, cache)?;
        }
        Ok(())
    }
}

/// `L 10,1 miss eviction`
pub fn write_access<W: Write>(out: &mut W, record: &AccessRecord, outcome: &Outcome) -> io::Result<()> {
    writeln!(out, "{record} {outcome}")
}

pub fn write_diagnostics<W: Write>(out: &mut W, record: &AccessRecord, outcome: &Outcome, cache: &Cache) -> io::Result<()> {
    let decoder = cache.decoder();
    writeln!(out, "Access diagnostics:")?;
    writeln!(out, "    Hits:    {}", outcome.hits)?;
    writeln!(out, "    Miss:    {}", outcome.missed)?;
    writeln!(out, "    Evict:   {}", outcome.evicted)?;
    writeln!(out, "    Type:    {}", record.kind.as_char())?;
    writeln!(out, "    Address: {:#010x}", record.address)?;
    writeln!(out, "    Size:    {}", record.size)?;
    writeln!(out, "    Tag:     {:#010x}", decoder.tag(record.address))?;
    writeln!(out, "    Index:   {:#010x}", decoder.set_index(record.address))?;
    writeln!(out, "    Offset:  {:#010x}", decoder.block_offset(record.address))?;
    writeln!(out)
}

/// Dumps every line of the cache, set by set
pub fn write_cache<W: Write>(out: &mut W, cache: &Cache) -> io::Result<()> {
    writeln!(out, "Cache status:")?;
    writeln!(out, "  Line  Set Slot Valid        Tag Rank")?;
    for (index, line) in cache.lines().iter().enumerate() {
        writeln!(
            out,
            "  {:4} {:4} {:4} {:>5} {:#010x} {:4}",
            index,
            index / cache.associativity(),
            index % cache.associativity(),
            line.valid(),
            line.tag(),
            line.rank()
        )?;
    }
    writeln!(out)
}
