//! Caption tracks as listed by the innertube player response

use search_adapter::render::{text, text_at};
use serde::Serialize;
use serde_json::Value;

use crate::error::{TranscriptError, TranscriptResult};

const BOT_CHECK: &str = "Sign in to confirm you're not a bot";
const AGE_GATE: &str = "This video may be inappropriate for some users.";
const UNAVAILABLE: &str = "This video is unavailable";

/// One caption track of a video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
    pub is_translatable: bool,
    #[serde(skip)]
    pub base_url: String,
}

/// A language a translatable track can be rendered into
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationLanguage {
    pub language: String,
    pub language_code: String,
}

/// Every track of one video
#[derive(Debug, Clone, Serialize)]
pub struct TrackList {
    pub video_id: String,
    pub tracks: Vec<Track>,
    pub translation_languages: Vec<TranslationLanguage>,
}

impl TrackList {
    /// First track matching the priority list; within one language a
    /// manually created track beats a generated one.
    pub fn find(&self, languages: &[String]) -> Option<&Track> {
        languages.iter().find_map(|code| {
            let matching = |generated: bool| {
                self.tracks.iter().find(|t| {
                    t.is_generated == generated && t.language_code.eq_ignore_ascii_case(code)
                })
            };
            matching(false).or_else(|| matching(true))
        })
    }

    /// Like [`find`](Self::find), failing with the available codes
    pub fn select(&self, languages: &[String], fallback_to_any: bool) -> TranscriptResult<&Track> {
        if let Some(track) = self.find(languages) {
            return Ok(track);
        }
        if fallback_to_any {
            // Manual tracks first, in listed order
            let any = self
                .tracks
                .iter()
                .find(|t| !t.is_generated)
                .or_else(|| self.tracks.first());
            if let Some(track) = any {
                tracing::info!(
                    video_id = %self.video_id,
                    language = %track.language_code,
                    "Requested language missing, falling back"
                );
                return Ok(track);
            }
        }
        Err(TranscriptError::LanguageUnavailable {
            video_id: self.video_id.clone(),
            requested: languages.to_vec(),
            available: self.codes(),
        })
    }

    pub fn codes(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.language_code.clone()).collect()
    }
}

/// Check `playabilityStatus` and pull the caption tracks out of a player
/// response.
pub fn parse_player(video_id: &str, player: &Value) -> TranscriptResult<TrackList> {
    check_playability(video_id, player)?;

    let Some(renderer) = player
        .get("captions")
        .and_then(|c| c.get("playerCaptionsTracklistRenderer"))
    else {
        return Err(TranscriptError::TranscriptsDisabled(video_id.to_string()));
    };

    let tracks: Vec<Track> = renderer
        .get("captionTracks")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(parse_track).collect())
        .unwrap_or_default();
    if tracks.is_empty() {
        return Err(TranscriptError::TranscriptsDisabled(video_id.to_string()));
    }

    let translation_languages = renderer
        .get("translationLanguages")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|lang| {
                    Some(TranslationLanguage {
                        language: label(lang.get("languageName")?)?,
                        language_code: text(lang, "languageCode")?,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(TrackList {
        video_id: video_id.to_string(),
        tracks,
        translation_languages,
    })
}

fn check_playability(video_id: &str, player: &Value) -> TranscriptResult<()> {
    let Some(status) = text_at(player, &["playabilityStatus", "status"]) else {
        return Ok(());
    };
    if status == "OK" {
        return Ok(());
    }

    let reason = text_at(player, &["playabilityStatus", "reason"]).unwrap_or_default();
    let id = video_id.to_string();
    match (status.as_str(), reason.as_str()) {
        ("LOGIN_REQUIRED", BOT_CHECK) => Err(TranscriptError::RequestBlocked(id)),
        ("LOGIN_REQUIRED", AGE_GATE) => Err(TranscriptError::AgeRestricted(id)),
        ("ERROR", UNAVAILABLE) => Err(TranscriptError::VideoUnavailable(id)),
        _ => {
            let mut details = vec![if reason.is_empty() { status.clone() } else { reason.clone() }];
            let subreason = player
                .get("playabilityStatus")
                .and_then(|p| p.get("errorScreen"))
                .and_then(|e| e.get("playerErrorMessageRenderer"))
                .and_then(|r| r.get("subreason"));
            if let Some(subreason) = subreason.and_then(label) {
                details.push(subreason);
            }
            Err(TranscriptError::Unplayable {
                video_id: id,
                reason: details.join(": "),
            })
        }
    }
}

fn parse_track(track: &Value) -> Option<Track> {
    let base_url = text(track, "baseUrl")?.replace("&fmt=srv3", "");
    let language_code = text(track, "languageCode")?;
    let language = track
        .get("name")
        .and_then(label)
        .unwrap_or_else(|| language_code.clone());
    Some(Track {
        language,
        language_code,
        is_generated: text(track, "kind").as_deref() == Some("asr"),
        is_translatable: track
            .get("isTranslatable")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        base_url,
    })
}

/// YouTube text is either `{simpleText}` or `{runs: [{text}]}`
fn label(value: &Value) -> Option<String> {
    if let Some(simple) = text(value, "simpleText") {
        return Some(simple);
    }
    let runs: String = value
        .get("runs")?
        .as_array()?
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();
    (!runs.trim().is_empty()).then_some(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn player() -> Value {
        json!({
            "playabilityStatus": {"status": "OK"},
            "captions": {"playerCaptionsTracklistRenderer": {
                "captionTracks": [
                    {"baseUrl": "https://yt/api/timedtext?v=x&lang=en&kind=asr&fmt=srv3",
                     "name": {"runs": [{"text": "English (auto-generated)"}]},
                     "languageCode": "en", "kind": "asr", "isTranslatable": true},
                    {"baseUrl": "https://yt/api/timedtext?v=x&lang=en",
                     "name": {"simpleText": "English"},
                     "languageCode": "en", "isTranslatable": true},
                    {"baseUrl": "https://yt/api/timedtext?v=x&lang=de",
                     "name": {"runs": [{"text": "German"}]},
                     "languageCode": "de", "kind": "asr"}
                ],
                "translationLanguages": [
                    {"languageCode": "fr", "languageName": {"runs": [{"text": "French"}]}}
                ]
            }}
        })
    }

    fn languages(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_parse_tracks() {
        let list = parse_player("x", &player()).unwrap();
        assert_eq!(list.tracks.len(), 3);
        assert_eq!(list.tracks[0].language, "English (auto-generated)");
        assert!(list.tracks[0].is_generated);
        assert_eq!(list.tracks[0].base_url, "https://yt/api/timedtext?v=x&lang=en&kind=asr");
        assert!(!list.tracks[2].is_translatable);
        assert_eq!(list.translation_languages[0].language, "French");
    }

    #[test]
    fn test_manual_track_preferred() {
        let list = parse_player("x", &player()).unwrap();
        let track = list.find(&languages(&["en"])).unwrap();
        assert!(!track.is_generated);
        assert_eq!(track.language, "English");
    }

    #[test]
    fn test_priority_order() {
        let list = parse_player("x", &player()).unwrap();
        let track = list.find(&languages(&["es", "de", "en"])).unwrap();
        assert_eq!(track.language_code, "de");
    }

    #[test]
    fn test_language_unavailable() {
        let list = parse_player("x", &player()).unwrap();
        let err = list.select(&languages(&["ja"]), false).unwrap_err();
        match err {
            TranscriptError::LanguageUnavailable { requested, available, .. } => {
                assert_eq!(requested, vec!["ja"]);
                assert_eq!(available, vec!["en", "en", "de"]);
            }
            other => panic!("unexpected {:?}", other),
        }
        let track = list.select(&languages(&["ja"]), true).unwrap();
        assert_eq!(track.language, "English");
    }

    #[test]
    fn test_playability() {
        let status = |status: &str, reason: &str| {
            json!({"playabilityStatus": {"status": status, "reason": reason}})
        };
        assert!(matches!(
            parse_player("x", &status("ERROR", UNAVAILABLE)),
            Err(TranscriptError::VideoUnavailable(_))
        ));
        assert!(matches!(
            parse_player("x", &status("LOGIN_REQUIRED", BOT_CHECK)),
            Err(TranscriptError::RequestBlocked(_))
        ));
        assert!(matches!(
            parse_player("x", &status("LOGIN_REQUIRED", AGE_GATE)),
            Err(TranscriptError::AgeRestricted(_))
        ));

        let mut private = status("LOGIN_REQUIRED", "This video is private");
        private["playabilityStatus"]["errorScreen"] = json!({"playerErrorMessageRenderer": {
            "subreason": {"runs": [{"text": "Ask the owner for access"}]}
        }});
        let err = parse_player("x", &private).unwrap_err();
        assert_eq!(
            err.to_string(),
            "video x is unplayable: This video is private: Ask the owner for access"
        );
    }

    #[test]
    fn test_no_captions() {
        let player = json!({"playabilityStatus": {"status": "OK"}});
        assert!(matches!(
            parse_player("x", &player),
            Err(TranscriptError::TranscriptsDisabled(_))
        ));
        let player = json!({"captions": {"playerCaptionsTracklistRenderer": {"captionTracks": []}}});
        assert!(matches!(
            parse_player("x", &player),
            Err(TranscriptError::TranscriptsDisabled(_))
        ));
    }
}
