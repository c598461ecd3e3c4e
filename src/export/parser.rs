//! Recover (host, message) rows from saved result-log text

use super::ExportRow;

const ARROW: char = '→';
const HOST_PREFIX: &str = "Host:";
const URL_PREFIX: &str = "URL:";
const RESULT_MARKER: &str = "Resultado:";

/// Parse log text into export rows, in order of appearance.
///
/// Each line is tried against the arrow shape, then the `Host:` block, then
/// the `URL:` block. Blocks consume the following line as their message.
/// Anything else is skipped.
pub fn parse(full_text: &str) -> Vec<ExportRow> {
    let lines: Vec<&str> = full_text.trim().lines().collect();
    let mut rows = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some((host, message)) = line.split_once(ARROW) {
            rows.push(ExportRow::new(host.trim(), message.trim()));
            i += 1;
            continue;
        }

        if let Some(host) = line.strip_prefix(HOST_PREFIX) {
            let message = match lines.get(i + 1) {
                Some(next) => match next.split_once(RESULT_MARKER) {
                    Some((_, result)) => result.trim(),
                    None => next.trim(),
                },
                None => "",
            };
            rows.push(ExportRow::new(host.trim(), message));
            i += 2;
            continue;
        }

        if let Some(url) = line.strip_prefix(URL_PREFIX) {
            let message = lines.get(i + 1).map_or("", |next| next.trim());
            rows.push(ExportRow::new(url.trim(), message));
            i += 2;
            continue;
        }

        i += 1;
    }

    rows
}
