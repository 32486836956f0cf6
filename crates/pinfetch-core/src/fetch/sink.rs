//! Response sink for one download hop: headers, body file, error body.
//!
//! The output file is opened lazily on the first body chunk of a 2xx response,
//! so a redirect or error never truncates an existing file. The handle lives in
//! the sink and is closed when the sink is dropped, whatever the exit path.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use curl::easy::WriteError;

use super::progress::ProgressReporter;
use super::REDIRECT_STATUS;
use crate::error::FetchError;
use crate::http::{body_excerpt, ResponseHeaders, BODY_EXCERPT_LIMIT};

/// What one hop produced.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Hop {
    /// Body saved; number of bytes written.
    Saved(u64),
    /// Redirect status with this raw `Location`.
    Redirect(String),
}

pub(crate) struct DownloadSink {
    dest: PathBuf,
    pub(crate) headers: ResponseHeaders,
    file: Option<BufWriter<File>>,
    error_body: Vec<u8>,
    write_error: Option<FetchError>,
    progress: ProgressReporter,
    written: u64,
}

impl DownloadSink {
    pub(crate) fn new(dest: PathBuf, progress: ProgressReporter) -> Self {
        Self {
            dest,
            headers: ResponseHeaders::default(),
            file: None,
            error_body: Vec::new(),
            write_error: None,
            progress,
            written: 0,
        }
    }

    /// libcurl write callback. Returning a short count aborts the transfer.
    pub(crate) fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        if !self.headers.is_success() {
            let room = BODY_EXCERPT_LIMIT.saturating_sub(self.error_body.len());
            self.error_body
                .extend_from_slice(&data[..data.len().min(room)]);
            return Ok(data.len());
        }
        match self.write_body(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                tracing::warn!("download write failed: {}", e);
                self.write_error = Some(e);
                Ok(0)
            }
        }
    }

    fn write_body(&mut self, data: &[u8]) -> Result<(), FetchError> {
        if self.file.is_none() {
            self.file = Some(self.open()?);
            self.progress.start(self.headers.content_length);
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(data)
                .map_err(|e| FetchError::io(&self.dest, e))?;
        }
        self.written += data.len() as u64;
        self.progress.advance(data.len() as u64);
        Ok(())
    }

    fn open(&self) -> Result<BufWriter<File>, FetchError> {
        if let Some(parent) = self.dest.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| FetchError::io(parent, e))?;
            }
        }
        let file = File::create(&self.dest).map_err(|e| FetchError::io(&self.dest, e))?;
        Ok(BufWriter::new(file))
    }

    /// Error recorded by the write callback, if the transfer was aborted by it.
    pub(crate) fn take_write_error(&mut self) -> Option<FetchError> {
        self.write_error.take()
    }

    /// Decide the hop outcome once the transfer finished without transport error.
    pub(crate) fn finish(mut self, url: &str) -> Result<Hop, FetchError> {
        let status = self.headers.status.unwrap_or(0);
        if status == REDIRECT_STATUS {
            if let Some(location) = self.headers.location.take() {
                return Ok(Hop::Redirect(location));
            }
        }
        if !self.headers.is_success() {
            return Err(FetchError::from_status(
                url,
                status,
                body_excerpt(&self.error_body),
            ));
        }

        let file = match self.file.take() {
            Some(f) => f,
            None => {
                // 2xx with an empty body still produces the file
                self.progress.start(self.headers.content_length);
                self.open()?
            }
        };
        let file = file
            .into_inner()
            .map_err(|e| FetchError::io(&self.dest, e.into_error()))?;
        file.sync_all().map_err(|e| FetchError::io(&self.dest, e))?;

        tracing::info!(
            dest = %self.dest.display(),
            bytes = self.written,
            "download complete"
        );
        Ok(Hop::Saved(self.written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink(dest: PathBuf, lines: &[&str]) -> DownloadSink {
        let mut s = DownloadSink::new(dest, ProgressReporter::new(None));
        for l in lines {
            s.headers.push_line(l.as_bytes());
        }
        s
    }

    #[test]
    fn success_body_lands_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested/out.bin");
        let mut s = sink(dest.clone(), &["HTTP/1.1 200 OK", "Content-Length: 6"]);
        assert_eq!(s.write(b"abc").unwrap(), 3);
        assert_eq!(s.write(b"def").unwrap(), 3);
        assert_eq!(s.finish("u").unwrap(), Hop::Saved(6));
        assert_eq!(std::fs::read(&dest).unwrap(), b"abcdef");
    }

    #[test]
    fn redirect_does_not_touch_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        std::fs::write(&dest, b"previous").unwrap();
        let mut s = sink(
            dest.clone(),
            &["HTTP/1.1 302 Found", "Location: https://storage.example.com/x"],
        );
        s.write(b"<html>moved</html>").unwrap();
        assert_eq!(
            s.finish("u").unwrap(),
            Hop::Redirect("https://storage.example.com/x".to_string())
        );
        assert_eq!(std::fs::read(&dest).unwrap(), b"previous");
    }

    #[test]
    fn error_status_keeps_body_excerpt() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        let mut s = sink(dest.clone(), &["HTTP/1.1 403 Forbidden"]);
        s.write(b"{\"message\":\"must have actions scope\"}").unwrap();
        let err = s.finish("https://api.example.com/zip").unwrap_err();
        assert!(matches!(err, FetchError::InsufficientScope { status: 403, .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn redirect_without_location_is_http_error() {
        let dir = tempfile::tempdir().unwrap();
        let s = sink(dir.path().join("out.bin"), &["HTTP/1.1 302 Found"]);
        assert_eq!(s.finish("u").unwrap_err().http_status(), Some(302));
    }

    #[test]
    fn empty_success_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("empty.bin");
        let s = sink(dest.clone(), &["HTTP/1.1 200 OK", "Content-Length: 0"]);
        assert_eq!(s.finish("u").unwrap(), Hop::Saved(0));
        assert_eq!(std::fs::read(&dest).unwrap().len(), 0);
    }

    #[test]
    fn unwritable_destination_aborts_transfer() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let mut s = sink(blocker.join("out.bin"), &["HTTP/1.1 200 OK"]);
        assert_eq!(s.write(b"data").unwrap(), 0);
        assert!(matches!(s.take_write_error(), Some(FetchError::Io { .. })));
    }
}
