use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use serde_derive::Deserialize;

use crate::error::{Error, Result};
use crate::ratings::RatingScale;

pub type UserId = u32;
pub type ItemId = u32;
pub type RatingValue = i32;
pub type Timestamp = i64;

/// Number of genre flags trailing every item record.
pub const GENRE_COUNT: usize = 19;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: UserId,
    pub age: u32,
    pub gender: String,
    pub occupation: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub release_date: String,
    pub video_release_date: String,
    pub url: String,
    pub genres: [bool; GENRE_COUNT],
}

impl Item {
    /// An item with only an id, for catalogs built outside the MovieLens files.
    pub fn with_id(id: ItemId) -> Self {
        Item {
            id,
            title: String::new(),
            release_date: String::new(),
            video_release_date: String::new(),
            url: String::new(),
            genres: [false; GENRE_COUNT],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub value: RatingValue,
    pub timestamp: Timestamp,
}

impl Rating {
    pub fn new(user_id: UserId, item_id: ItemId, value: RatingValue) -> Self {
        Rating {
            user_id,
            item_id,
            value,
            timestamp: 0,
        }
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or_default()
}

fn malformed(path: &Path, line: u64, reason: impl ToString) -> Error {
    Error::Malformed {
        path: path.display().to_string(),
        line,
        reason: reason.to_string(),
    }
}

/// Reads the pipe separated `id|age|gender|occupation|zip` user file.
pub fn read_users<P: AsRef<Path>>(path: P) -> Result<Vec<User>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .quoting(false)
        .trim(Trim::All)
        .from_path(path)?;

    let mut users = Vec::new();
    for result in reader.records() {
        let record = result?;
        let user: User = record
            .deserialize(None)
            .map_err(|e| malformed(path, line_of(&record), e))?;
        users.push(user);
    }
    log::debug!("read {} users from {}", users.len(), path.display());
    Ok(users)
}

/// Reads the pipe separated item file. Titles in the MovieLens files are
/// Latin-1 encoded, so text fields are decoded lossily.
pub fn read_items<P: AsRef<Path>>(path: P) -> Result<Vec<Item>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_path(path)?;

    let mut items = Vec::new();
    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        items.push(parse_item(&record).map_err(|reason| malformed(path, line, reason))?);
    }
    log::debug!("read {} items from {}", items.len(), path.display());
    Ok(items)
}

fn parse_item(record: &ByteRecord) -> std::result::Result<Item, String> {
    if record.len() != 5 + GENRE_COUNT {
        return Err(format!(
            "expected {} fields, found {}",
            5 + GENRE_COUNT,
            record.len()
        ));
    }
    let text = |index: usize| String::from_utf8_lossy(&record[index]).trim().to_string();

    let id = text(0)
        .parse::<ItemId>()
        .map_err(|e| format!("item id: {}", e))?;

    let mut genres = [false; GENRE_COUNT];
    for (genre, flag) in genres.iter_mut().zip(record.iter().skip(5)) {
        *genre = match flag {
            b"1" => true,
            b"0" => false,
            other => {
                return Err(format!(
                    "genre flag must be 0 or 1, found {:?}",
                    String::from_utf8_lossy(other)
                ))
            }
        };
    }

    Ok(Item {
        id,
        title: text(1),
        release_date: text(2),
        video_release_date: text(3),
        url: text(4),
        genres,
    })
}

/// Reads the tab separated `user\titem\tvalue\ttimestamp` rating file in
/// source order, rejecting values outside `scale`.
pub fn read_ratings<P: AsRef<Path>>(path: P, scale: &RatingScale) -> Result<Vec<Rating>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .trim(Trim::All)
        .from_path(path)?;

    let mut ratings = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = line_of(&record);
        let rating: Rating = record
            .deserialize(None)
            .map_err(|e| malformed(path, line, e))?;
        if !scale.contains(rating.value) {
            return Err(malformed(
                path,
                line,
                format!(
                    "rating {} outside of scale {}..={}",
                    rating.value, scale.min, scale.max
                ),
            ));
        }
        ratings.push(rating);
    }
    log::debug!("read {} ratings from {}", ratings.len(), path.display());
    Ok(ratings)
}
