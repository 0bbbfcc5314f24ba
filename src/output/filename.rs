/// Characters that cannot appear in output file names
const INVALID_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Strips invalid filename characters from an item name and trims whitespace
///
/// The result may be empty when the name consists entirely of invalid
/// characters; callers fall back to the `Unknown` sentinel name well before
/// that happens, since extraction never produces an empty title.
///
/// # Examples
///
/// ```
/// use catalog_harvest::output::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Some Game: Remastered"), "Some Game Remastered");
/// assert_eq!(sanitize_filename("  A/B  "), "AB");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !INVALID_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}
