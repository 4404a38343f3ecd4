// Leaderboard CSV input
//
// One row per model with columns `model`, `score` and an optional
// `publisher`. Header names are matched case-insensitively.

use std::io::Read;
use std::path::Path;

use benchcat_recon::error::ReconError;
use benchcat_recon::model::LeaderboardRow;

pub fn read_leaderboard(path: &Path) -> Result<Vec<LeaderboardRow>, ReconError> {
    let content = read_file_as_utf8(path)?;
    parse_leaderboard(&content)
        .map_err(|e| ReconError::Io(format!("{}: {e}", path.display())))
}

/// Parse leaderboard rows. Rows with an empty model name are dropped; an
/// unparseable score becomes `None` and is counted as missing downstream.
pub fn parse_leaderboard(content: &str) -> Result<Vec<LeaderboardRow>, String> {
    let delimiter = sniff_delimiter(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
    };
    let model_col = column("model").ok_or("missing 'model' column")?;
    let score_col = column("score").ok_or("missing 'score' column")?;
    let publisher_col = column("publisher");

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| e.to_string())?;
        let model = record.get(model_col).unwrap_or("").trim();
        if model.is_empty() {
            log::debug!("leaderboard row {}: empty model name, skipped", line + 2);
            continue;
        }

        let publisher = publisher_col
            .and_then(|col| record.get(col))
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        rows.push(LeaderboardRow {
            model_name: model.to_string(),
            publisher_name: publisher,
            score: record.get(score_col).and_then(parse_score),
        });
    }
    Ok(rows)
}

/// `"72.4"`, `"72.4%"` and `" 72.4 % "` all parse; anything else is `None`.
fn parse_score(field: &str) -> Option<f64> {
    let trimmed = field.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma), count fields per line. The delimiter that
/// produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b','];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (scraped exports are sometimes Windows-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, ReconError> {
    let io_err = |e: std::io::Error| ReconError::Io(format!("{}: {e}", path.display()));
    let mut file = std::fs::File::open(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}
