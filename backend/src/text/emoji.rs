//! Emoji and emoticon handling.
//!
//! Emoji removal works on Unicode ranges; conversion and emoticon handling
//! use the lookup tables below.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static EMOJI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "[",
        r"\x{1F600}-\x{1F64F}", // emoticons
        r"\x{1F300}-\x{1F5FF}", // symbols & pictographs
        r"\x{1F680}-\x{1F6FF}", // transport & map symbols
        r"\x{1F1E0}-\x{1F1FF}", // flags
        r"\x{2702}-\x{27B0}",   // dingbats
        r"\x{24C2}-\x{1F251}",  // enclosed characters
        "]+"
    ))
    .expect("valid emoji pattern")
});

/// Emoticon -> description.
const EMOTICONS: &[(&str, &str)] = &[
    (":-)", "Happy face smiley"),
    (":)", "Happy face smiley"),
    (":-]", "Happy face smiley"),
    (":]", "Happy face smiley"),
    ("=)", "Happy face smiley"),
    (":-D", "Laughing, big grin or laugh with glasses"),
    (":D", "Laughing, big grin or laugh with glasses"),
    ("8-D", "Laughing, big grin or laugh with glasses"),
    ("XD", "Laughing, big grin or laugh with glasses"),
    ("=D", "Laughing, big grin or laugh with glasses"),
    (":-(", "Frown, sad, angry or pouting"),
    (":(", "Frown, sad, angry or pouting"),
    (">:(", "Angry"),
    (">:-(", "Angry"),
    (":'-(", "Crying"),
    (":'(", "Crying"),
    (":'-)", "Tears of happiness"),
    (":')", "Tears of happiness"),
    (":-O", "Surprise"),
    (":O", "Surprise"),
    (":-o", "Surprise"),
    (":-*", "Kiss"),
    (":*", "Kiss"),
    (";-)", "Wink or smirk"),
    (";)", "Wink or smirk"),
    (":-P", "Tongue sticking out, cheeky, playful or blowing a raspberry"),
    (":P", "Tongue sticking out, cheeky, playful or blowing a raspberry"),
    (":-p", "Tongue sticking out, cheeky, playful or blowing a raspberry"),
    (":p", "Tongue sticking out, cheeky, playful or blowing a raspberry"),
    (":-/", "Skeptical, annoyed, undecided, uneasy or hesitant"),
    (":-|", "Straight face no expression, indecision"),
    (":|", "Straight face no expression, indecision"),
    (":-$", "Embarrassed or blushing"),
    (":$", "Embarrassed or blushing"),
    (":-X", "Sealed lips or wearing braces or tongue-tied"),
    (":X", "Sealed lips or wearing braces or tongue-tied"),
    ("B-)", "Cool"),
    ("O:-)", "Angel, saint or innocent"),
    ("O:)", "Angel, saint or innocent"),
    ("^_^", "Joyful"),
    ("^^", "Joyful"),
    ("-_-", "Annoyed"),
    ("o_O", "Surprised"),
    ("O_o", "Surprised"),
    ("<3", "Heart"),
    ("</3", "Broken heart"),
];

/// Emoji name -> emoji.
const EMOJIS: &[(&str, &str)] = &[
    ("grinning_face", "\u{1F600}"),
    ("beaming_face_with_smiling_eyes", "\u{1F601}"),
    ("face_with_tears_of_joy", "\u{1F602}"),
    ("grinning_face_with_big_eyes", "\u{1F603}"),
    ("grinning_face_with_smiling_eyes", "\u{1F604}"),
    ("grinning_face_with_sweat", "\u{1F605}"),
    ("grinning_squinting_face", "\u{1F606}"),
    ("smiling_face_with_halo", "\u{1F607}"),
    ("winking_face", "\u{1F609}"),
    ("smiling_face_with_smiling_eyes", "\u{1F60A}"),
    ("face_savoring_food", "\u{1F60B}"),
    ("relieved_face", "\u{1F60C}"),
    ("smiling_face_with_heart-eyes", "\u{1F60D}"),
    ("smiling_face_with_sunglasses", "\u{1F60E}"),
    ("smirking_face", "\u{1F60F}"),
    ("neutral_face", "\u{1F610}"),
    ("expressionless_face", "\u{1F611}"),
    ("unamused_face", "\u{1F612}"),
    ("pensive_face", "\u{1F614}"),
    ("confused_face", "\u{1F615}"),
    ("face_blowing_a_kiss", "\u{1F618}"),
    ("face_with_tongue", "\u{1F61B}"),
    ("winking_face_with_tongue", "\u{1F61C}"),
    ("disappointed_face", "\u{1F61E}"),
    ("worried_face", "\u{1F61F}"),
    ("angry_face", "\u{1F620}"),
    ("pouting_face", "\u{1F621}"),
    ("crying_face", "\u{1F622}"),
    ("loudly_crying_face", "\u{1F62D}"),
    ("fearful_face", "\u{1F628}"),
    ("face_screaming_in_fear", "\u{1F631}"),
    ("astonished_face", "\u{1F632}"),
    ("sleeping_face", "\u{1F634}"),
    ("slightly_smiling_face", "\u{1F642}"),
    ("upside-down_face", "\u{1F643}"),
    ("thinking_face", "\u{1F914}"),
    ("rolling_on_the_floor_laughing", "\u{1F923}"),
    ("thumbs_up", "\u{1F44D}"),
    ("thumbs_down", "\u{1F44E}"),
    ("clapping_hands", "\u{1F44F}"),
    ("waving_hand", "\u{1F44B}"),
    ("folded_hands", "\u{1F64F}"),
    ("OK_hand", "\u{1F44C}"),
    ("flexed_biceps", "\u{1F4AA}"),
    ("red_heart", "\u{2764}\u{FE0F}"),
    ("broken_heart", "\u{1F494}"),
    ("fire", "\u{1F525}"),
    ("sparkles", "\u{2728}"),
    ("party_popper", "\u{1F389}"),
    ("hundred_points", "\u{1F4AF}"),
    ("star", "\u{2B50}"),
    ("sun", "\u{2600}\u{FE0F}"),
    ("rocket", "\u{1F680}"),
    ("check_mark_button", "\u{2705}"),
    ("cross_mark", "\u{274C}"),
    ("pile_of_poo", "\u{1F4A9}"),
    ("skull", "\u{1F480}"),
    ("see-no-evil_monkey", "\u{1F648}"),
];

/// Emoticon alternation, longest emoticons first so `:-))` never splits.
static EMOTICON_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let mut emoticons: Vec<&str> = EMOTICONS.iter().map(|(e, _)| *e).collect();
    emoticons.sort_by_key(|e| std::cmp::Reverse(e.len()));
    let alternation: Vec<String> = emoticons.iter().map(|e| regex::escape(e)).collect();
    Regex::new(&format!("(?:{})", alternation.join("|"))).expect("valid emoticon pattern")
});

static EMOTICON_WORDS: Lazy<HashMap<&'static str, String>> = Lazy::new(|| {
    EMOTICONS
        .iter()
        .map(|(emoticon, description)| (*emoticon, underscore_words(description)))
        .collect()
});

/// "Frown, sad or pouting" -> "Frown_sad_or_pouting"
fn underscore_words(description: &str) -> String {
    description
        .replace([':', ','], "")
        .split(' ')
        .collect::<Vec<_>>()
        .join("_")
}

/// Remove emoji characters.
pub fn remove_emoji(text: &str) -> String {
    EMOJI_PATTERN.replace_all(text, "").into_owned()
}

/// Remove emoticons such as `:-)` or `<3`.
pub fn remove_emoticons(text: &str) -> String {
    EMOTICON_PATTERN.replace_all(text, "").into_owned()
}

/// Replace emoticons with their description (`:)` -> `Happy_face_smiley`).
pub fn convert_emoticons(text: &str) -> String {
    EMOTICON_PATTERN
        .replace_all(text, |caps: &regex::Captures<'_>| {
            EMOTICON_WORDS
                .get(&caps[0])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Replace emojis with their name (`🔥` -> `fire`).
pub fn convert_emojis(text: &str) -> String {
    let mut converted = text.to_string();
    for (name, emoji) in EMOJIS {
        if converted.contains(emoji) {
            converted = converted.replace(emoji, &underscore_words(name));
        }
    }
    converted
}
