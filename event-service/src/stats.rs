use rsvp_shared::models::{Attendee, Category, EventRecord};
use serde::Serialize;

use crate::view::{ProfileMap, AVATAR_PLACEHOLDER};

pub const TOP_ATTENDEE_LIMIT: usize = 5;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: String,
    pub value: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TopAttendee {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub events_attended: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HostStats {
    pub has_data: bool,
    pub total_events: usize,
    pub categories: Vec<CategoryCount>,
    pub top_attendees: Vec<TopAttendee>,
    pub unique_attendees: usize,
}

impl HostStats {
    pub fn empty() -> Self {
        Self {
            has_data: false,
            total_events: 0,
            categories: Vec::new(),
            top_attendees: Vec::new(),
            unique_attendees: 0,
        }
    }
}

/// Aggregates a host's events and the RSVPs to them.
///
/// Only attendees with a profile full name are ranked or counted.
pub fn compute(events: &[EventRecord], attendees: &[Attendee], profiles: &ProfileMap) -> HostStats {
    if events.is_empty() {
        return HostStats::empty();
    }

    let mut categories: Vec<(Category, usize)> = Vec::new();
    for event in events {
        match categories.iter_mut().find(|(c, _)| *c == event.category) {
            Some((_, count)) => *count += 1,
            None => categories.push((event.category, 1)),
        }
    }

    // (user id, name, avatar, count), first-seen order
    let mut people: Vec<(String, String, String, usize)> = Vec::new();
    for attendee in attendees {
        let Some(profile) = profiles.get(&attendee.user_id) else {
            continue;
        };
        let Some(name) = profile.full_name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        match people.iter_mut().find(|p| p.0 == attendee.user_id) {
            Some(person) => person.3 += 1,
            None => people.push((
                attendee.user_id.clone(),
                name.to_string(),
                profile
                    .avatar_url
                    .clone()
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| AVATAR_PLACEHOLDER.to_string()),
                1,
            )),
        }
    }

    let unique_attendees = people.len();
    // sort_by is stable, so ties keep first-seen order
    people.sort_by(|a, b| b.3.cmp(&a.3));

    HostStats {
        has_data: true,
        total_events: events.len(),
        categories: categories
            .into_iter()
            .map(|(category, value)| CategoryCount {
                name: category.label().to_string(),
                value,
            })
            .collect(),
        top_attendees: people
            .into_iter()
            .take(TOP_ATTENDEE_LIMIT)
            .map(|(id, name, avatar, events_attended)| TopAttendee {
                id,
                name,
                avatar,
                events_attended,
            })
            .collect(),
        unique_attendees,
    }
}
