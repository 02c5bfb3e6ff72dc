use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use flate2::read::MultiGzDecoder;

/// Opens a file for buffered reading, decompressing it if its extension is `.gz`.
pub fn open<P>(src: P) -> io::Result<Box<dyn BufRead>>
where
    P: AsRef<Path>,
{
    let src = src.as_ref();
    let file = File::open(src)?;

    if is_gzip(src) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn is_gzip(src: &Path) -> bool {
    src.extension().is_some_and(|ext| ext == "gz")
}
