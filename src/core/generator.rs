const PROLOGUE: &str = "@echo off";
const EPILOGUE: &str = "pause";

/// Single existence-check line for `filename` under `path_prefix`.
pub fn existence_check_line(path_prefix: &str, filename: &str) -> String {
    format!(
        "if exist \"{}\\{}\" (echo {} found) else (echo {} missing)",
        path_prefix, filename, filename, filename
    )
}

/// Build the existence-check batch script.
///
/// Returns an empty string when there is nothing to check or no path
/// prefix resolved. Filenames are emitted in the given order, duplicates
/// included.
pub fn generate(filenames: &[String], path_prefix: Option<&str>) -> String {
    let path_prefix = match path_prefix {
        Some(prefix) if !filenames.is_empty() => prefix,
        _ => return String::new(),
    };

    let checks = filenames
        .iter()
        .map(|file| existence_check_line(path_prefix, file))
        .collect::<Vec<String>>()
        .join("\n");

    format!("{}\n{}\n\n{}", PROLOGUE, checks, EPILOGUE)
}
