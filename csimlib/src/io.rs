use std::fs::File;
use std::io::BufRead;
use std::path::Path;
use crate::error::{Error, Result};

/// Opens a trace file for a single sequential pass
///
/// On unix the file is memory mapped and the OS is advised that reads are sequential, elsewhere
/// a large buffered reader is used
pub fn open_trace(path: &Path) -> Result<impl BufRead> {
    let unavailable = |source| Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(unavailable)?;
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        use std::io::BufReader;
        const BUFFER_SIZE: usize = 64 * 4096;
        Ok(BufReader::with_capacity(BUFFER_SIZE, file))
    }
    #[cfg(unix)]
    {
        use std::io::Cursor;
        use memmap2::{Advice, Mmap};
        // The mapping is read only and dropped with the reader. Truncating the trace while it is
        // being replayed is unsupported
        let mapped = unsafe { Mmap::map(&file) }.map_err(unavailable)?;
        mapped.advise(Advice::Sequential).map_err(unavailable)?;
        Ok(Cursor::new(mapped))
    }
}
