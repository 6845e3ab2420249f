use std::fs::File;

use anyhow::{Context as _, Result};
use dbpf_sdk::{DbpfFile, RidFormat, SimDataDocument};

fn main() -> Result<()> {
    let path = std::env::args().nth(1).context("usage: read [package_path]")?;
    let mut file = DbpfFile::open(File::open(&path)?)?;

    let header = file.header();
    dbg!(header.file_version);
    dbg!(header.index_count);

    let entries = file.scan_index(None)?;
    for entry in &entries {
        println!("{}", entry.id.to_string_as(RidFormat::Colon));
    }

    // show the first resource's raw content and, if it parses as SimData,
    // its named single-row tables.
    if let Some(entry) = entries.first() {
        let bytes = file.get_content(&entry.locator, entry.decompressed_size)?;
        dbg!(bytes.len());

        if let Ok(document) = SimDataDocument::parse(std::io::Cursor::new(bytes)) {
            for name in document.content_names() {
                dbg!(name);
            }
            if !document.errors.is_empty() {
                dbg!(&document.errors);
            }
        }
    }

    Ok(())
}
