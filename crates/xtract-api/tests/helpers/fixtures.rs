//! Test fixtures: small archives in every accepted input format.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Cursor, Read, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

/// Entries used by most end-to-end tests.
pub const SAMPLE_FILES: &[(&str, &str)] = &[("a.txt", "hello"), ("sub/b.txt", "world")];

pub fn create_zip(files: &[(&str, &str)]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, data) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

/// Zip whose central directory marks every entry as encrypted.
pub fn create_encrypted_zip(files: &[(&str, &str)]) -> Vec<u8> {
    let mut data = create_zip(files);
    let positions: Vec<usize> = data
        .windows(4)
        .enumerate()
        .filter(|(_, w)| *w == b"PK\x01\x02")
        .map(|(i, _)| i)
        .collect();
    for pos in positions {
        data[pos + 8] |= 0x01;
    }
    data
}

pub fn create_tar(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, data.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap()
}

pub fn create_tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&create_tar(files)).unwrap();
    encoder.finish().unwrap()
}

fn rar_block(head_type: u8, flags: u16, body: &[u8]) -> Vec<u8> {
    let mut header = vec![head_type];
    header.extend_from_slice(&flags.to_le_bytes());
    header.extend_from_slice(&((7 + body.len()) as u16).to_le_bytes());
    header.extend_from_slice(body);

    let crc = (crc32fast::hash(&header) & 0xFFFF) as u16;
    let mut out = crc.to_le_bytes().to_vec();
    out.extend(header);
    out
}

fn build_rar(files: &[(&str, &str)], encrypted: bool) -> Vec<u8> {
    let mut out = b"Rar!\x1a\x07\x00".to_vec();
    out.extend(rar_block(0x73, 0, &[0u8; 6]));

    for (name, data) in files {
        let data = data.as_bytes();
        let mut body = Vec::new();
        body.extend_from_slice(&(data.len() as u32).to_le_bytes());
        body.extend_from_slice(&(data.len() as u32).to_le_bytes());
        body.push(3); // unix host
        body.extend_from_slice(&crc32fast::hash(data).to_le_bytes());
        body.extend_from_slice(&0x5821_0000u32.to_le_bytes());
        body.push(29);
        body.push(0x30); // stored
        body.extend_from_slice(&(name.len() as u16).to_le_bytes());
        body.extend_from_slice(&0o100644u32.to_le_bytes());
        body.extend_from_slice(name.as_bytes());

        let flags = if encrypted { 0x8004 } else { 0x8000 };
        out.extend(rar_block(0x74, flags, &body));
        out.extend_from_slice(data);
    }

    out.extend(rar_block(0x7B, 0x4000, &[]));
    out
}

/// Stored (uncompressed) RAR 4 archive.
pub fn create_rar(files: &[(&str, &str)]) -> Vec<u8> {
    build_rar(files, false)
}

/// RAR 4 archive whose file headers carry the encrypted flag.
pub fn create_encrypted_rar(files: &[(&str, &str)]) -> Vec<u8> {
    build_rar(files, true)
}

/// Sorted (name, contents) pairs of the files in a zip; directories are skipped.
pub fn read_zip(bytes: &[u8]) -> Vec<(String, String)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut files = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).unwrap();
        if entry.is_dir() {
            continue;
        }
        let mut contents = String::new();
        entry.read_to_string(&mut contents).unwrap();
        files.push((entry.name().to_string(), contents));
    }
    files.sort();
    files
}

pub fn sample_contents() -> Vec<(String, String)> {
    SAMPLE_FILES
        .iter()
        .map(|(name, data)| (name.to_string(), data.to_string()))
        .collect()
}
