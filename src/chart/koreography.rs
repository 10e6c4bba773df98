//! Koreography asset loader.
//!
//! A Koreography export is a JSON object keyed by the chart title:
//!
//! ```json
//! { "My Song": { "value": {
//!     "mSampleRate": 44100,
//!     "mTracks": [
//!         { "mEventID": "0", "mEventList": [ { "mStartSample": 1000, "mEndSample": 1000 } ] },
//!         { "mEventID": "TimingPoint", "mEventList": [] }
//!     ]
//! } } }
//! ```
//!
//! Tracks `"0"` and `"1"` hold the notes of each lane. Timing point tracks
//! are skipped.

use crate::models::{Chart, DEFAULT_SAMPLE_RATE, Lane, Note};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const TIMING_POINT_TRACK: &str = "TimingPoint";

#[derive(Debug, Deserialize)]
struct Asset {
    value: Koreography,
}

#[derive(Debug, Deserialize)]
struct Koreography {
    #[serde(rename = "mSampleRate", default)]
    sample_rate: Option<SampleRate>,
    #[serde(rename = "mTracks", default)]
    tracks: Vec<Track>,
}

/// Some exporters write the sample rate as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SampleRate {
    Number(u32),
    Text(String),
}

impl SampleRate {
    fn resolve(&self) -> Result<u32, String> {
        match self {
            SampleRate::Number(rate) => Ok(*rate),
            SampleRate::Text(text) => text
                .trim()
                .parse()
                .map_err(|e| format!("Invalid sample rate {:?}: {}", text, e)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Track {
    #[serde(rename = "mEventID")]
    event_id: String,
    #[serde(rename = "mEventList", default)]
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct Event {
    #[serde(rename = "mStartSample")]
    start_sample: u64,
    #[serde(rename = "mEndSample")]
    end_sample: u64,
}

/// Parses a Koreography JSON document into a chart.
pub fn parse_koreography(json: &str) -> Result<Chart, String> {
    let assets: BTreeMap<String, Asset> =
        serde_json::from_str(json).map_err(|e| format!("Invalid Koreography JSON: {}", e))?;

    let mut entries = assets.into_iter();
    let (title, asset) = entries
        .next()
        .ok_or_else(|| "Koreography file has no chart".to_string())?;
    if entries.next().is_some() {
        log::warn!("Koreography file holds several charts, only {:?} is used", title);
    }

    let koreography = asset.value;
    let sample_rate = match &koreography.sample_rate {
        Some(rate) => rate.resolve()?,
        None => DEFAULT_SAMPLE_RATE,
    };
    if sample_rate == 0 {
        return Err(format!("{}: sample rate is zero", title));
    }

    let mut notes = Vec::new();
    for track in &koreography.tracks {
        if track.event_id == TIMING_POINT_TRACK {
            continue;
        }
        let lane = track
            .event_id
            .parse::<u8>()
            .ok()
            .and_then(Lane::from_index)
            .ok_or_else(|| format!("{}: unknown track {:?}", title, track.event_id))?;

        for event in &track.events {
            if event.start_sample != event.end_sample {
                return Err(format!(
                    "{}: track {} has a span event ({} to {}), only taps are supported",
                    title, track.event_id, event.start_sample, event.end_sample
                ));
            }
            notes.push(Note::new(lane, event.start_sample));
        }
    }

    Ok(Chart::new(title, sample_rate, notes))
}

/// Loads a Koreography file from disk.
pub fn load_koreography(path: &Path) -> Result<Chart, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
    parse_koreography(&content).map_err(|e| {
        log::error!("Failed to load chart {:?}: {}", path, e);
        e
    })
}
