/// Tunables for a single audit run. Everything that governs classifier
/// behavior lives here so a run is reproducible from its configuration alone.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Worker threads for tag extraction (default: all available cores).
    pub num_threads: usize,

    /// File extensions considered audio candidates, lowercase without dots.
    pub extensions: Vec<String>,

    /// Durations shorter than this are flagged as implausible (seconds).
    pub min_duration_secs: f64,

    /// Durations longer than this are flagged as implausible (seconds).
    pub max_duration_secs: f64,

    /// Sample rates below this are flagged (Hz).
    pub min_sample_rate_hz: u32,

    /// File-size bucket width for duplicate fingerprinting (bytes).
    pub size_bucket_bytes: u64,

    /// Regex patterns stripped from titles before fingerprinting. Matched
    /// case-insensitively against decorations like "(Remastered 2011)".
    pub decoration_patterns: Vec<String>,

    /// Penalty weights folded into the health score.
    pub weights: PenaltyWeights,

    /// How many artists/composers the snapshot tracks.
    pub top_k: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct PenaltyWeights {
    pub missing_tag: f64,
    pub anomaly: f64,
    pub duplicate: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            missing_tag: 1.0,
            anomaly: 2.0,
            duplicate: 2.0,
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            extensions: vec![
                "mp3".to_string(),
                "flac".to_string(),
                "ogg".to_string(),
                "oga".to_string(),
                "opus".to_string(),
                "wav".to_string(),
                "m4a".to_string(),
                "aac".to_string(),
            ],
            min_duration_secs: 5.0,
            max_duration_secs: 3.0 * 3600.0,
            min_sample_rate_hz: 22_050,
            size_bucket_bytes: 64 * 1024,
            decoration_patterns: vec![
                // Parenthesized or bracketed edition/version suffixes
                r"[(\[][^)\]]*\b(remaster(ed)?|deluxe|anniversary|expanded|edition|mono|stereo|live|demo|bonus|single version|radio edit|re-?issue)\b[^)\]]*[)\]]".to_string(),
                // Trailing "- 2011 Remaster" style suffixes
                r"-\s*(\d{4}\s+)?remaster(ed)?(\s+\d{4})?\s*$".to_string(),
                // Any remaining bracketed suffix at the end of the title
                r"[(\[][^)\]]*[)\]]\s*$".to_string(),
            ],
            weights: PenaltyWeights::default(),
            top_k: 10,
        }
    }
}

impl AuditConfig {
    pub fn is_supported_extension(&self, ext: &str) -> bool {
        let lowered = ext.to_lowercase();
        self.extensions.iter().any(|e| *e == lowered)
    }
}
