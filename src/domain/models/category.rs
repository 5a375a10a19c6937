use serde::Serialize;

/// Display category of a stored file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Document,
    Image,
    Video,
    Audio,
    Archive,
    Code,
    Data,
    Unknown,
}

impl FileCategory {
    /// Maps an extension (case-insensitive, leading `.` optional) to its category.
    pub fn classify(extension: &str) -> Self {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        match extension.as_str() {
            "pdf" | "doc" | "docx" | "txt" => FileCategory::Document,
            "jpg" | "jpeg" | "png" | "gif" | "svg" => FileCategory::Image,
            "mp4" | "avi" | "mov" => FileCategory::Video,
            "mp3" | "wav" => FileCategory::Audio,
            "zip" | "rar" | "tar" | "gz" => FileCategory::Archive,
            "html" | "css" | "js" | "php" | "py" | "cpp" | "c" | "java" => FileCategory::Code,
            "json" | "xml" | "csv" | "xls" | "xlsx" => FileCategory::Data,
            _ => FileCategory::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_their_category() {
        assert_eq!(FileCategory::classify("pdf"), FileCategory::Document);
        assert_eq!(FileCategory::classify("png"), FileCategory::Image);
        assert_eq!(FileCategory::classify("mov"), FileCategory::Video);
        assert_eq!(FileCategory::classify("wav"), FileCategory::Audio);
        assert_eq!(FileCategory::classify("gz"), FileCategory::Archive);
        assert_eq!(FileCategory::classify("py"), FileCategory::Code);
        assert_eq!(FileCategory::classify("csv"), FileCategory::Data);
    }

    #[test]
    fn lookup_ignores_case_and_leading_dot() {
        assert_eq!(FileCategory::classify(".JPEG"), FileCategory::Image);
        assert_eq!(FileCategory::classify("XlsX"), FileCategory::Data);
    }

    #[test]
    fn unmapped_extensions_fall_back_to_unknown() {
        assert_eq!(FileCategory::classify(""), FileCategory::Unknown);
        assert_eq!(FileCategory::classify("exe"), FileCategory::Unknown);
    }

    #[test]
    fn serializes_as_lowercase_label() {
        let json = serde_json::to_string(&FileCategory::Archive).unwrap();
        assert_eq!(json, "\"archive\"");
    }
}
