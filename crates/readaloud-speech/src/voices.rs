//! Voice selection: scores engine voices against a target language tag.

use readaloud_core::ports::engine::VoiceDescriptor;

/// Pick the best voice for `target_lang` out of `voices`.
///
/// Tags are compared case-insensitively with `_` treated as `-`. An exact
/// tag match beats a regional sibling (same primary subtag, different
/// region), which beats a bare primary-subtag voice; local voices win ties
/// against remote ones. Returns `None` when the target tag is empty or
/// nothing matches at all, which tells the engine to use its own default.
#[must_use]
pub fn select_voice(target_lang: &str, voices: &[VoiceDescriptor]) -> Option<String> {
    let target = normalize_tag(target_lang);
    if target.is_empty() {
        return None;
    }
    let primary = primary_subtag(&target);

    let mut best: Option<(&VoiceDescriptor, i32)> = None;
    for voice in voices {
        let score = score_voice(voice, &target, primary);
        // Strictly greater: earlier voices win ties, engine order is stable.
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((voice, score));
        }
    }
    best.map(|(voice, _)| voice.name.clone())
}

/// Order voices the way a picker presents them: by language tag, then name,
/// both case-insensitive.
#[must_use]
pub fn sorted(mut voices: Vec<VoiceDescriptor>) -> Vec<VoiceDescriptor> {
    voices.sort_by_key(|v| (v.lang.to_lowercase(), v.name.to_lowercase()));
    voices
}

// ── Internal helpers ───────────────────────────────────────────────

/// Score one candidate against the normalized target tag.
fn score_voice(voice: &VoiceDescriptor, target: &str, primary: &str) -> i32 {
    let tag = normalize_tag(&voice.lang);
    let mut score = if tag == target {
        100
    } else if primary_subtag(&tag) == primary && tag.contains('-') {
        60
    } else if tag == primary {
        55
    } else {
        0
    };

    // Locality is a tie-breaker only; an unrelated local voice must not
    // outrank "no match" and hijack the engine-default path.
    if score > 0 && voice.is_local {
        score += 10;
    }
    score
}

/// Lowercase a tag and unify `_` separators to `-`.
fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase().replace('_', "-")
}

/// Leading language component of a tag (`"en"` from `"en-GB"`).
fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}
