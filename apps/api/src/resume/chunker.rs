/// Chunks of this many characters or fewer carry too little signal to retrieve.
pub const MIN_CHUNK_CHARS: usize = 10;

/// Splits a master resume into retrievable chunks: one per line, trimmed,
/// keeping only lines longer than `MIN_CHUNK_CHARS` characters. Line order is kept.
pub fn chunk_resume(resume_text: &str) -> Vec<String> {
    resume_text
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_CHUNK_CHARS)
        .map(String::from)
        .collect()
}
