/// Path segment under which the prediction service serves stored uploads.
pub const UPLOADS_SEGMENT: &str = "uploads";

/// Final component of a server-side storage path, accepting either separator.
pub fn image_file_name(image_path: &str) -> Option<&str> {
    image_path
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Builds the retrieval URL for a stored upload, or `None` when the stored
/// path carries no usable file name.
pub fn image_url(base_url: &str, image_path: Option<&str>) -> Option<String> {
    let file_name = image_file_name(image_path?)?;
    Some(format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        UPLOADS_SEGMENT,
        urlencoding::encode(file_name)
    ))
}

pub fn guess_mime_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
