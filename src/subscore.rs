use std::collections::BTreeSet;

use crate::model::attribute::{JobLevel, Location, MetroGroup, OrgPath, PersonalityType, Track};
use crate::model::condition::{Preferences, Score};
use crate::model::entity::{Member, Tag};
use crate::tables;

pub const NEUTRAL: Score = 0.5;

pub fn personality_compatibility(a: Option<&str>, b: Option<&str>) -> Score {
    match (a.and_then(PersonalityType::parse), b.and_then(PersonalityType::parse)) {
        (Some(a), Some(b)) => tables::PERSONALITY_MATRIX[a.index()][b.index()],
        _ => NEUTRAL,
    }
}

pub fn job_level_relationship(a: Option<&str>, b: Option<&str>) -> Score {
    match (a.and_then(JobLevel::resolve), b.and_then(JobLevel::resolve)) {
        (Some(a), Some(b)) => job_level_score(&a, &b),
        _ => NEUTRAL,
    }
}

pub fn job_level_score(a: &JobLevel, b: &JobLevel) -> Score {
    match (a, b) {
        (JobLevel::Position(a), JobLevel::Position(b)) => {
            let gap = a.rank().abs_diff(b.rank());
            if gap == 0 {
                0.8
            } else if gap == 1 {
                1.0
            } else if a.track() == b.track() {
                0.6
            } else if a.track() != Track::General && b.track() != Track::General {
                0.7
            } else {
                0.4
            }
        }
        _ => legacy_role_score(a, b),
    }
}

fn legacy_role_score(a: &JobLevel, b: &JobLevel) -> Score {
    if a.label() == b.label() {
        0.6
    } else if tables::are_complementary_roles(a.label(), b.label()) {
        1.0
    } else if a.family().is_some() && a.family() == b.family() {
        0.5
    } else {
        0.3
    }
}

pub fn org_proximity(a: Option<&str>, b: Option<&str>, prefer_cross: bool) -> Score {
    match (a.and_then(OrgPath::parse), b.and_then(OrgPath::parse)) {
        (Some(a), Some(b)) => org_path_score(&a, &b, prefer_cross),
        _ => NEUTRAL,
    }
}

pub fn org_path_score(a: &OrgPath, b: &OrgPath, prefer_cross: bool) -> Score {
    let shared = a.shared_prefix(b);
    if a.is_same_path(b) {
        if prefer_cross { 0.3 } else { 0.6 }
    } else if shared >= 2 {
        if prefer_cross { 0.5 } else { 0.7 }
    } else if shared == 1 {
        if prefer_cross { 0.8 } else { 0.6 }
    } else if tables::has_unit_synergy(a.top(), b.top()) {
        1.0
    } else if prefer_cross {
        0.4
    } else {
        0.3
    }
}

pub fn location_proximity(a: Option<&str>, b: Option<&str>) -> Score {
    match (a.and_then(Location::parse), b.and_then(Location::parse)) {
        (Some(a), Some(b)) => location_score(&a, &b),
        _ => NEUTRAL,
    }
}

pub fn location_score(a: &Location, b: &Location) -> Score {
    if a == b {
        return 1.0;
    }
    if *a == Location::Remote || *b == Location::Remote {
        return 0.5;
    }
    if *a == Location::Overseas || *b == Location::Overseas {
        return 0.3;
    }
    match (a.metro_group(), b.metro_group()) {
        (Some(MetroGroup::Capital), Some(MetroGroup::Capital)) => 0.7,
        (Some(MetroGroup::Regional), Some(MetroGroup::Regional)) => 0.4,
        (Some(_), Some(_)) => 0.4,
        _ => 0.3,
    }
}

/// Jaccard similarity; two empty sets score 0.
pub fn tag_overlap(a: &BTreeSet<Tag>, b: &BTreeSet<Tag>) -> Score {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as Score / union as Score
}

pub fn common_tags(a: &BTreeSet<Tag>, b: &BTreeSet<Tag>) -> Vec<Tag> {
    a.intersection(b).cloned().collect()
}

pub fn preference_match(preferences: Option<&Preferences>, candidate: &Member) -> Score {
    let preferences = match preferences {
        Some(p) if !p.is_empty() => p,
        _ => return NEUTRAL,
    };

    let mut criteria = 0usize;
    let mut matched = 0usize;

    if !preferences.departments.is_empty() {
        criteria += 1;
        let hit = candidate.org_path().is_some_and(|path| {
            let full = candidate.department.as_deref().unwrap_or_default().trim();
            preferences
                .departments
                .iter()
                .any(|d| d.trim().eq_ignore_ascii_case(path.top()) || d.trim().eq_ignore_ascii_case(full))
        });
        matched += usize::from(hit);
    }
    if !preferences.job_levels.is_empty() {
        criteria += 1;
        let hit = candidate.job().is_some_and(|job| {
            preferences
                .job_levels
                .iter()
                .filter_map(|raw| JobLevel::resolve(raw))
                .any(|wanted| wanted == job)
        });
        matched += usize::from(hit);
    }
    if !preferences.locations.is_empty() {
        criteria += 1;
        let hit = candidate.place().is_some_and(|place| {
            preferences
                .locations
                .iter()
                .filter_map(|raw| Location::parse(raw))
                .any(|wanted| wanted == place)
        });
        matched += usize::from(hit);
    }
    if !preferences.personality_types.is_empty() {
        criteria += 1;
        let hit = candidate.personality_type().is_some_and(|code| {
            preferences
                .personality_types
                .iter()
                .filter_map(|raw| PersonalityType::parse(raw))
                .any(|wanted| wanted == code)
        });
        matched += usize::from(hit);
    }

    matched as Score / criteria as Score
}

/// Cosine similarity mapped from [-1, 1] to [0, 1]. `None` when either
/// vector is unusable (absent, empty, zero-norm or mismatched length).
pub fn embedding_similarity(a: Option<&[f32]>, b: Option<&[f32]>) -> Option<Score> {
    let (a, b) = (a?, b?);
    if a.is_empty() || a.len() != b.len() {
        return None;
    }
    let (dot, norm_a, norm_b) = a.iter().zip(b.iter()).fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (x, y)| {
        let (x, y) = (f64::from(*x), f64::from(*y));
        (dot + x * y, na + x * x, nb + y * y)
    });
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    let cosine = (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0);
    Some((cosine + 1.0) / 2.0)
}
