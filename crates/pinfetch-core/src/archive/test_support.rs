//! Fixture builders shared by the archive tests.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

pub(crate) fn tar_gz_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        builder.append_data(&mut header, path, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

pub(crate) fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
    std::fs::write(path, tar_gz_bytes(entries)).unwrap();
}

pub(crate) fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    write_zip_with_links(path, entries, &[]);
}

/// Files are stored with mode 0755; `links` are (name, target) symlinks.
pub(crate) fn write_zip_with_links(path: &Path, entries: &[(&str, &[u8])], links: &[(&str, &str)]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    for (name, target) in links {
        zip.add_symlink(*name, *target, zip::write::SimpleFileOptions::default())
            .unwrap();
    }
    zip.finish().unwrap();
}
