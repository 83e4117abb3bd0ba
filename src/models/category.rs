use serde::{Deserialize, Serialize};

use super::id::null_as_default;
use super::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(alias = "ID", alias = "Id")]
    pub id: RecordId,
    #[serde(default, alias = "Name", deserialize_with = "null_as_default")]
    pub name: String,
}
