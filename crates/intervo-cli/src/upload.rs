//! Upload boundary: turns paths into named payloads for the playlist.
//!
//! Only readable, non-empty files with an audio extension get through; the
//! core never sees a path.

use std::path::{Path, PathBuf};

use intervo_core::UploadedFile;

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "oga", "flac", "m4a", "aac", "opus", "webm"];

#[derive(Debug)]
pub struct Rejected {
    pub path: PathBuf,
    pub reason: String,
}

/// Read every path, keeping input order for the accepted ones.
pub fn read_files(paths: &[PathBuf]) -> (Vec<UploadedFile>, Vec<Rejected>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for path in paths {
        match read_one(path) {
            Ok(file) => accepted.push(file),
            Err(reason) => {
                tracing::warn!(path = %path.display(), %reason, "upload rejected");
                rejected.push(Rejected {
                    path: path.clone(),
                    reason,
                });
            }
        }
    }

    (accepted, rejected)
}

fn read_one(path: &Path) -> Result<UploadedFile, String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| "not a file".to_string())?;

    let is_audio = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)));
    if !is_audio {
        return Err("not an audio file".into());
    }

    if path.is_dir() {
        return Err("is a directory".into());
    }
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    if bytes.is_empty() {
        return Err("file is empty".into());
    }

    Ok(UploadedFile { name, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_audio_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let b = dir.path().join("b.MP3");
        let a = dir.path().join("a.flac");
        std::fs::write(&b, b"bbb").unwrap();
        std::fs::write(&a, b"aaa").unwrap();

        let (files, rejected) = read_files(&[b, a]);
        assert!(rejected.is_empty());
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b.MP3", "a.flac"]);
        assert_eq!(files[1].bytes, b"aaa");
    }

    #[test]
    fn rejects_bad_inputs_but_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.ogg");
        let empty = dir.path().join("empty.wav");
        let text = dir.path().join("notes.txt");
        let missing = dir.path().join("missing.mp3");
        std::fs::write(&good, b"ogg").unwrap();
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&text, b"hello").unwrap();

        let (files, rejected) = read_files(&[good, empty.clone(), text, missing]);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "good.ogg");
        assert_eq!(rejected.len(), 3);
        assert_eq!(rejected[0].path, empty);
        assert_eq!(rejected[0].reason, "file is empty");
    }
}
