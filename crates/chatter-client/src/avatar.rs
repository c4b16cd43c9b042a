//! Avatar URL helpers.

use rand::Rng;
use url::form_urlencoded;

/// Background colours for generated avatars.
const AVATAR_COLORS: [&str; 14] = [
    "7289da", "43b581", "faa61a", "f04747", "593695", "747f8d", "2c2f33", "99aab5", "ff6b6b",
    "4ecdc4", "45b7d1", "a67f5d", "b056db", "f7d794",
];

/// DiceBear styles used by [`random_avatar_url`].
pub const AVATAR_STYLES: [&str; 10] = [
    "micah",
    "avataaars",
    "bottts",
    "personas",
    "thumbs",
    "lorelei",
    "notionists",
    "adventurer",
    "fun-emoji",
    "big-smile",
];

const FALLBACK_AVATAR: &str =
    "https://ui-avatars.com/api/?name=User&background=747f8d&color=fff&size=200";

/// Initials avatar for `username`. The same name always gets the same colour.
pub fn avatar_url(username: &str, size: u32) -> String {
    if username.trim().is_empty() {
        return fallback_avatar_url().to_string();
    }

    let idx = hash_code(username).unsigned_abs() as usize % AVATAR_COLORS.len();
    // Spaces as %20 rather than the form-style '+'; a literal '+' is already %2B.
    let name = form_urlencoded::byte_serialize(username.as_bytes())
        .collect::<String>()
        .replace('+', "%20");

    format!(
        "https://ui-avatars.com/api/?name={name}&background={}&color=fff&size={size}",
        AVATAR_COLORS[idx]
    )
}

/// A random DiceBear avatar.
pub fn random_avatar_url() -> String {
    let mut rng = rand::rng();
    let color = AVATAR_COLORS[rng.random_range(0..AVATAR_COLORS.len())];
    let style = AVATAR_STYLES[rng.random_range(0..AVATAR_STYLES.len())];
    let seed: u32 = rng.random_range(0..10_000);

    format!("https://api.dicebear.com/6.x/{style}/svg?seed={seed}&backgroundColor={color}")
}

pub fn fallback_avatar_url() -> &'static str {
    FALLBACK_AVATAR
}

/// Accepts URLs ending in a known image extension, or pointing at one of the
/// avatar services above.
pub fn is_valid_image_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    let has_image_ext = url.rsplit_once('.').is_some_and(|(_, ext)| {
        ["jpeg", "jpg", "gif", "png", "svg"]
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    });

    has_image_ext
        || url.starts_with("https://ui-avatars.com/")
        || url.starts_with("https://avatars.dicebear.com/")
        || url.starts_with("https://api.dicebear.com/")
}

/// 32-bit string hash over UTF-16 code units (`h = h * 31 + c`, wrapping).
fn hash_code(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}
