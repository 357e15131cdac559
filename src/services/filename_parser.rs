// src/services/filename_parser.rs
//
// Filename Parser
//
// Pure, deterministic mapping from a raw file name to a structured
// {title, year, file_name} record, or a rejection when the extension is
// not a known video format.
//
// RULES (explicit and ordered):
// 1. Extension must be on the allow-list, else the file is rejected
// 2. Noise tokens are removed whole-word, case-insensitively
// 3. Separators (dots, underscores, dashes, brackets) become spaces
// 4. Whitespace is collapsed
// 5. A trailing 4-digit token is extracted as the release year

use regex::Regex;

use crate::domain::resolution::ParsedFilename;

/// Extensions accepted as movie files
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp",
];

/// Release-name noise removed before the title is read.
/// Matched whole-word and case-insensitively.
const NOISE_TOKENS: &[&str] = &[
    "2160p", "1080p", "720p", "480p", "4k", "uhd", "hdr", "10bit", "bluray", "blu-ray", "brrip",
    "bdrip", "webrip", "web-dl", "webdl", "hdrip", "dvdrip", "dvdscr", "camrip", "hdcam", "hdtv",
    "x264", "x265", "h264", "h265", "hevc", "xvid", "divx", "aac", "ac3", "dts", "yify", "yts",
    "rarbg", "amzn", "extended", "unrated", "remastered", "proper", "repack", "limited",
    "internal", "multi", "subbed", "dubbed",
];

/// Deterministic filename parsing rules.
pub struct FilenameParser {
    noise_pattern: Regex,
    separator_pattern: Regex,
    whitespace_pattern: Regex,
    trailing_year_pattern: Regex,
}

impl Default for FilenameParser {
    fn default() -> Self {
        let alternation = NOISE_TOKENS.join("|");
        Self {
            noise_pattern: Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).unwrap(),
            separator_pattern: Regex::new(r"[._\-\[\]\(\)\{\}+]").unwrap(),
            whitespace_pattern: Regex::new(r"\s+").unwrap(),
            trailing_year_pattern: Regex::new(r"(?:^|\s)(\d{4})$").unwrap(),
        }
    }
}

impl FilenameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one file name.
    ///
    /// Returns None when the extension is missing or not a video format.
    /// A title that becomes empty after stripping is still returned; the
    /// caller decides whether to treat it as invalid.
    pub fn parse(&self, file_name: &str) -> Option<ParsedFilename> {
        let (stem, _extension) = self.split_extension(file_name)?;

        let cleaned = self.noise_pattern.replace_all(stem, " ");
        let separated = self.separator_pattern.replace_all(&cleaned, " ");
        let mut title = self
            .whitespace_pattern
            .replace_all(separated.trim(), " ")
            .to_string();

        let mut year = None;
        let trailing_year = self.trailing_year_pattern.captures(&title).map(|captures| {
            let matched = captures.get(1).unwrap();
            (matched.start(), matched.as_str().to_string())
        });
        if let Some((start, value)) = trailing_year {
            year = Some(value);
            title.truncate(start);
            let trimmed_len = title.trim_end().len();
            title.truncate(trimmed_len);
        }

        Some(ParsedFilename::new(title, year, file_name.to_string()))
    }

    /// Parse a list of file names, dropping rejects, ordered by title
    /// (case-insensitive).
    ///
    /// No side effects; safe to call repeatedly with the same input.
    pub fn parse_batch(&self, file_names: &[String]) -> Vec<ParsedFilename> {
        let mut parsed: Vec<ParsedFilename> = file_names
            .iter()
            .filter_map(|name| self.parse(name))
            .collect();

        parsed.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        parsed
    }

    /// Split off a recognized video extension; None rejects the file.
    fn split_extension<'a>(&self, file_name: &'a str) -> Option<(&'a str, &'a str)> {
        let (stem, extension) = file_name.rsplit_once('.')?;
        let lowered = extension.to_lowercase();
        if VIDEO_EXTENSIONS.contains(&lowered.as_str()) {
            Some((stem, extension))
        } else {
            None
        }
    }
}
