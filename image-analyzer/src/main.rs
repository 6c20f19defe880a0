use gptscan::{PartitionEntry, scan_table};
use std::io::Read;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: {} <image_file>", args[0]);
        return ExitCode::FAILURE;
    }

    let path = &args[1];
    println!("[Parsing \"{path}\"]");
    println!("====================");

    let image = match load_image(path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Failed to read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let scan = scan_table(&image);
    for (idx, partition) in scan.entries.iter().enumerate() {
        print_partition(idx + 1, partition);
    }

    if let Some(err) = scan.error {
        eprintln!("Scan halted after {} partition(s): {err}", scan.entries.len());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Reads the whole image file into memory in binary mode.
fn load_image(path: &str) -> std::io::Result<Vec<u8>> {
    let mut file = std::fs::File::open(path)?;
    let mut image = Vec::new();
    file.read_to_end(&mut image)?;
    Ok(image)
}

fn print_partition(number: usize, p: &PartitionEntry) {
    println!("Partition {number}:");
    println!("Partition Type GUID: {}", p.type_guid_hex());
    println!("Unique Partition GUID: {}", p.unique_guid_hex());
    println!("First LBA: {}", p.first_lba);
    println!("Last LBA: {}", p.last_lba);
    println!("File Size: {} bytes", p.size_bytes);
    println!(
        "File System (HEX): {} ({})",
        p.fs_signature_hex(),
        signature_text(&p.fs_signature)
    );
    println!("====================");
}

/// Renders the raw signature bytes as text, dotting out anything that is not
/// printable ASCII.
fn signature_text(sig: &[u8; 4]) -> String {
    sig.iter()
        .map(|&b| {
            if (32..=126).contains(&b) {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}
