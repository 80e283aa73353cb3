use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use crate::dao::models::RankedEntry;

/// Plain key/value pair, keyed by `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoValueDocument {
    #[serde(rename = "_id")]
    pub key: String,
    pub value: String,
}

/// One member of a ranked set. `(set, member)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMemberDocument {
    pub set: String,
    pub member: String,
    pub score: f64,
}

impl From<MongoMemberDocument> for RankedEntry {
    fn from(value: MongoMemberDocument) -> Self {
        RankedEntry::new(value.member, value.score)
    }
}

pub fn value_id(key: &str) -> Document {
    doc! { "_id": key }
}

pub fn member_filter(set: &str, member: &str) -> Document {
    doc! { "set": set, "member": member }
}

/// Members ranked strictly ahead of `(score, member)` in descending order.
pub fn ahead_of(set: &str, member: &str, score: f64) -> Document {
    doc! {
        "set": set,
        "$or": [
            { "score": { "$gt": score } },
            { "score": score, "member": { "$gt": member } },
        ],
    }
}
