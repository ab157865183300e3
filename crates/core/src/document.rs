use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chardetng::EncodingDetector;
use encoding_rs::{Encoding as RsEncoding, BIG5, GBK, SHIFT_JIS, WINDOWS_1252};
use thiserror::Error;
use tracing::debug;

/// 文字檔解碼時使用的編碼。 / Encoding a text file was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Legacy(LegacyEncoding),
}

impl Encoding {
    /// 編碼的標準名稱。 / Canonical encoding label.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Utf16Be => "utf-16be",
            Encoding::Legacy(legacy) => legacy.name(),
        }
    }
}

/// 非 Unicode 檔案可辨識的舊式編碼。 / Legacy multi-byte encodings recognised when a file is not valid Unicode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyEncoding {
    Windows1252,
    ShiftJis,
    Gbk,
    Big5,
}

impl LegacyEncoding {
    pub fn name(self) -> &'static str {
        match self {
            LegacyEncoding::Windows1252 => "windows-1252",
            LegacyEncoding::ShiftJis => "shift-jis",
            LegacyEncoding::Gbk => "gbk",
            LegacyEncoding::Big5 => "big5",
        }
    }

    fn to_rs(self) -> &'static RsEncoding {
        match self {
            LegacyEncoding::Windows1252 => WINDOWS_1252,
            LegacyEncoding::ShiftJis => SHIFT_JIS,
            LegacyEncoding::Gbk => GBK,
            LegacyEncoding::Big5 => BIG5,
        }
    }
}

/// 讀寫文字檔時發生的錯誤。 / Errors raised while reading or writing a text file.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not in a supported text encoding")]
    InvalidEncoding { path: PathBuf },
}

impl DocumentError {
    /// 發生錯誤的檔案路徑。 / Path of the file involved.
    pub fn path(&self) -> &Path {
        match self {
            DocumentError::Read { path, .. }
            | DocumentError::Write { path, .. }
            | DocumentError::InvalidEncoding { path } => path,
        }
    }

    /// 顯示給使用者的系統錯誤原因。 / The OS-level reason, as shown to the user.
    pub fn reason(&self) -> String {
        match self {
            DocumentError::Read { source, .. } | DocumentError::Write { source, .. } => {
                source.to_string()
            }
            DocumentError::InvalidEncoding { .. } => "unsupported text encoding".to_string(),
        }
    }
}

/// 從磁碟解碼的文字及偵測到的編碼。 / Text decoded from disk together with the encoding that was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedText {
    pub text: String,
    pub encoding: Encoding,
}

/// 將整個檔案讀取為文字。 / Reads a whole file as text.
///
/// UTF-8 (with or without BOM) and BOM-marked UTF-16 are decoded directly;
/// anything else falls back to a detected legacy encoding.
pub fn read_text(path: impl AsRef<Path>) -> Result<LoadedText, DocumentError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = decode_bytes(&bytes).ok_or_else(|| DocumentError::InvalidEncoding {
        path: path.to_path_buf(),
    })?;
    debug!(
        path = %path.display(),
        encoding = loaded.encoding.name(),
        bytes = bytes.len(),
        "loaded text file"
    );
    Ok(loaded)
}

/// 以 UTF-8 覆寫 `path`，不轉換換行字元。 / Overwrites `path` with `text` encoded as UTF-8, without transforming line endings.
pub fn write_text(path: impl AsRef<Path>, text: &str) -> Result<(), DocumentError> {
    let path = path.as_ref();
    let write = || -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(text.as_bytes())?;
        file.flush()
    };
    write().map_err(|source| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "wrote text file");
    Ok(())
}

fn decode_bytes(bytes: &[u8]) -> Option<LoadedText> {
    if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        let text = String::from_utf8(rest.to_vec()).ok()?;
        return Some(LoadedText {
            text,
            encoding: Encoding::Utf8,
        });
    }

    if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
        return Some(LoadedText {
            text: decode_utf16(rest, false)?,
            encoding: Encoding::Utf16Le,
        });
    }

    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        return Some(LoadedText {
            text: decode_utf16(rest, true)?,
            encoding: Encoding::Utf16Be,
        });
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Some(LoadedText {
            text: text.to_owned(),
            encoding: Encoding::Utf8,
        });
    }

    let legacy = detect_legacy_encoding(bytes)?;
    Some(LoadedText {
        text: decode_legacy(bytes, legacy)?,
        encoding: Encoding::Legacy(legacy),
    })
}

fn decode_utf16(bytes: &[u8], big_endian: bool) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| {
            let pair = [chunk[0], chunk[1]];
            if big_endian {
                u16::from_be_bytes(pair)
            } else {
                u16::from_le_bytes(pair)
            }
        })
        .collect();
    String::from_utf16(&units).ok()
}

fn decode_legacy(bytes: &[u8], legacy: LegacyEncoding) -> Option<String> {
    let (cow, had_errors) = legacy.to_rs().decode_without_bom_handling(bytes);
    if had_errors {
        return None;
    }
    Some(match cow {
        Cow::Borrowed(slice) => slice.to_owned(),
        Cow::Owned(string) => string,
    })
}

fn detect_legacy_encoding(bytes: &[u8]) -> Option<LegacyEncoding> {
    if bytes.is_empty() {
        return None;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, true);
    if guess == WINDOWS_1252 {
        Some(LegacyEncoding::Windows1252)
    } else if guess == SHIFT_JIS {
        Some(LegacyEncoding::ShiftJis)
    } else if guess == GBK {
        Some(LegacyEncoding::Gbk)
    } else if guess == BIG5 {
        Some(LegacyEncoding::Big5)
    } else {
        None
    }
}
