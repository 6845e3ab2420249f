use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context as _, Result};
use dbpf_sdk::{DbpfWriter, Rid};

fn main() -> Result<()> {
    let path = std::env::args().nth(1).context("usage: write [package_path]")?;

    let mut writer = DbpfWriter::new(BufWriter::new(File::create(&path)?))?;
    writer.put(Rid::new(0, 1, 0x0333_4E60), b"hello, dbpf")?;
    writer.put(Rid::new(0, 2, 0x0333_4E60), b"world")?;
    writer.commit()?;

    Ok(())
}
