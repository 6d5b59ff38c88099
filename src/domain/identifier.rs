use serde::{Deserialize, Serialize};

/// Identifier used when the system reports nothing usable.
pub const UNKNOWN_IDENTIFIER: &str = "Unknown";

/// Generic product name used when the catalog cannot name the machine.
pub const GENERIC_PRODUCT_NAME: &str = "Mac";

/// The one identifier whose generic name must not be refined from the
/// System Profiler preferences; the hardware file is authoritative for it.
pub const PREFERENCES_PROBE_EXEMPT_IDENTIFIER: &str = "MacPro7,1";

/// Marker token selecting the relevant line of the hardware-description file.
pub const HARDWARE_FILE_MARKER: &str = "Model Identifier";

/// Broad chassis class of a Mac.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacType {
    Desktop,
    Laptop,
}

impl MacType {
    /// Classify a machine by its identifier family or catalog name.
    ///
    /// Apple Silicon laptops use the shared `MacNN,N` family, so the
    /// product name is consulted as well.
    pub fn classify(identifier: &str, product_name: &str) -> Self {
        if identifier.starts_with("MacBook") || product_name.starts_with("MacBook") {
            MacType::Laptop
        } else {
            MacType::Desktop
        }
    }
}

impl std::fmt::Display for MacType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MacType::Desktop => write!(f, "desktop"),
            MacType::Laptop => write!(f, "laptop"),
        }
    }
}

/// Canonicalize a raw `hw.model` value.
///
/// Takes the text after the last `:`, trims it, and substitutes
/// [`UNKNOWN_IDENTIFIER`] when nothing is left.
pub fn parse_model_identifier(raw: &str) -> String {
    let id = raw.rsplit(':').next().unwrap_or_default().trim();
    if id.is_empty() {
        UNKNOWN_IDENTIFIER.to_string()
    } else {
        id.to_string()
    }
}

/// Select the 1-based `field` of `line` split on `delim`, like `cut -d -f`.
///
/// A line without the delimiter is passed through whole, or dropped when
/// `only_delimited` is set (`cut -s`). A missing field yields `""`.
pub fn cut_field(line: &str, delim: char, field: usize, only_delimited: bool) -> Option<&str> {
    if !line.contains(delim) {
        return if only_delimited { None } else { Some(line) };
    }
    Some(line.split(delim).nth(field.saturating_sub(1)).unwrap_or(""))
}

/// Collapse runs of identical adjacent lines, like `uniq`.
pub fn dedup_adjacent<'a, I>(lines: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<&'a str> = Vec::new();
    for line in lines {
        if out.last() != Some(&line) {
            out.push(line);
        }
    }
    out
}

/// Pull the marketing name out of `defaults read ... "CPU Names"` output.
///
/// Entries look like `"XXXX-en-US_US" = "MacBook Pro (16-inch, 2019)";`.
pub fn extract_cpu_name(output: &str) -> Option<String> {
    let names = output
        .lines()
        .filter_map(|line| cut_field(line, '"', 4, true));

    dedup_adjacent(names)
        .into_iter()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

/// Pull the model line out of the hardware-description file contents.
pub fn extract_hardware_model(contents: &str) -> Option<String> {
    let fields: Vec<&str> = contents
        .lines()
        .filter(|line| line.contains(HARDWARE_FILE_MARKER))
        .filter_map(|line| cut_field(line, ':', 4, false))
        .collect();

    let joined = fields.join("\n");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_prefix_and_whitespace() {
        assert_eq!(
            parse_model_identifier("  hw.model: MacBookPro16,1  "),
            "MacBookPro16,1"
        );
        assert_eq!(parse_model_identifier("iMac18,2\n"), "iMac18,2");
    }

    #[test]
    fn test_parse_empty_is_unknown() {
        assert_eq!(parse_model_identifier(""), UNKNOWN_IDENTIFIER);
        assert_eq!(parse_model_identifier(" \n\t "), UNKNOWN_IDENTIFIER);
        assert_eq!(parse_model_identifier("hw.model:   "), UNKNOWN_IDENTIFIER);
    }

    #[test]
    fn test_cut_field_semantics() {
        assert_eq!(cut_field("a:b:c:d", ':', 4, false), Some("d"));
        assert_eq!(cut_field("a:b", ':', 4, false), Some(""));
        assert_eq!(cut_field("no delimiter", ':', 4, false), Some("no delimiter"));
        assert_eq!(cut_field("no delimiter", ':', 4, true), None);
    }

    #[test]
    fn test_dedup_adjacent_only_collapses_runs() {
        let lines = dedup_adjacent(["a", "a", "b", "a", "a"]);
        assert_eq!(lines, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_extract_cpu_name() {
        let output = "{\n    \"C02X-en-US_US\" = \"MacBook Pro (16-inch, 2019)\";\n    \"C02X-en-GB_GB\" = \"MacBook Pro (16-inch, 2019)\";\n}\n";
        assert_eq!(
            extract_cpu_name(output).as_deref(),
            Some("MacBook Pro (16-inch, 2019)")
        );
        assert_eq!(extract_cpu_name("{\n}\n"), None);
        assert_eq!(extract_cpu_name(""), None);
    }

    #[test]
    fn test_extract_hardware_model() {
        let contents = "Hardware:\nHardware:Model Identifier:Overview:iMac Pro (2017)\nOther: line\n";
        assert_eq!(
            extract_hardware_model(contents).as_deref(),
            Some("iMac Pro (2017)")
        );
        assert_eq!(extract_hardware_model("      Model Identifier: iMac18,2\n"), None);
        assert_eq!(extract_hardware_model("nothing relevant"), None);
    }

    #[test]
    fn test_mac_type_classify() {
        assert_eq!(MacType::classify("MacBookAir10,1", "Mac"), MacType::Laptop);
        assert_eq!(MacType::classify("Mac14,2", "MacBook Air (M2, 2022)"), MacType::Laptop);
        assert_eq!(MacType::classify("iMac18,2", "iMac (Retina 4K, 2017)"), MacType::Desktop);
        assert_eq!(MacType::classify("Unknown", "Mac (UNKNOWN)"), MacType::Desktop);
    }
}
