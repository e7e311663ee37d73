const URDU_DICTIONARY: &[(&str, &str)] = &[
    ("this", "یہ"),
    ("blog", "بلاگ"),
    ("discusses", "بیان کرتا ہے"),
    ("how", "کیسے"),
    ("daily", "روزانہ"),
    ("mindfulness", "ذہنی سکون"),
    ("practices", "مشقیں"),
    ("like", "جیسے"),
    ("meditation", "مراقبہ"),
    ("improve", "بہتر بناتی ہیں"),
    ("mental", "ذہنی"),
    ("health", "صحت"),
    ("and", "اور"),
    ("reduce", "کم کرتی ہیں"),
    ("stress", "تناؤ"),
];

fn lookup(word: &str) -> Option<&'static str> {
    let key: String = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect();
    if key.is_empty() {
        return None;
    }
    URDU_DICTIONARY
        .iter()
        .find(|(english, _)| *english == key)
        .map(|(_, urdu)| *urdu)
}

/// Word-by-word dictionary substitution; unknown tokens are kept as written.
pub fn translate_to_urdu(text: &str) -> String {
    text.split_whitespace()
        .map(|word| lookup(word).unwrap_or(word))
        .collect::<Vec<_>>()
        .join(" ")
}
