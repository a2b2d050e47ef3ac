/// File type classification
///
/// Maps a filename's extension to a coarse category (used by the frontend
/// to pick preview and icon behavior) and to a MIME type for inline
/// serving. Both tables are fixed; unknown extensions classify as `Other`
/// with no MIME type.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Coarse file category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Pdf,
    Ppt,
    Word,
    Excel,
    Video,
    Image,
    Other,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Pdf => "pdf",
            FileCategory::Ppt => "ppt",
            FileCategory::Word => "word",
            FileCategory::Excel => "excel",
            FileCategory::Video => "video",
            FileCategory::Image => "image",
            FileCategory::Other => "other",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(FileCategory::Pdf),
            "ppt" => Ok(FileCategory::Ppt),
            "word" => Ok(FileCategory::Word),
            "excel" => Ok(FileCategory::Excel),
            "video" => Ok(FileCategory::Video),
            "image" => Ok(FileCategory::Image),
            "other" => Ok(FileCategory::Other),
            _ => Err(format!("Unknown file category: {}", s)),
        }
    }
}

/// Classify a filename by its extension
///
/// Returns the category and, when recognized, the MIME type for inline
/// serving. The two tables differ: an extension can carry a MIME type yet
/// still classify as `Other` (txt, svg, csv).
pub fn classify(filename: &str) -> (FileCategory, Option<&'static str>) {
    let ext = extension(filename);

    let category = match ext.as_deref() {
        Some("pdf") => FileCategory::Pdf,
        Some("ppt") | Some("pptx") => FileCategory::Ppt,
        Some("doc") | Some("docx") => FileCategory::Word,
        Some("xls") | Some("xlsx") => FileCategory::Excel,
        Some("mp4") | Some("avi") | Some("mov") | Some("webm") => FileCategory::Video,
        Some("jpg") | Some("jpeg") | Some("png") | Some("gif") | Some("webp") => {
            FileCategory::Image
        }
        _ => FileCategory::Other,
    };

    (category, ext.as_deref().and_then(mime_type))
}

/// Lowercased extension of a filename, without the dot
fn extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// MIME type for a known extension
fn mime_type(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "flv" => "video/x-flv",
        "wmv" => "video/x-ms-wmv",
        "mkv" => "video/x-matroska",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tiff" | "tif" => "image/tiff",
        "doc" | "dot" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "docm" => "application/vnd.ms-word.document.macroEnabled.12",
        "dotx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.template",
        "ppt" | "pps" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "pptm" => "application/vnd.ms-powerpoint.presentation.macroEnabled.12",
        "ppsx" => "application/vnd.openxmlformats-officedocument.presentationml.slideshow",
        "xls" | "xlt" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xlsm" => "application/vnd.ms-excel.sheet.macroEnabled.12",
        "xltx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.template",
        "csv" => "text/csv",
        "txt" => "text/plain",
        _ => return None,
    };

    Some(mime)
}
