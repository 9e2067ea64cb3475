// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::environment::recipe::ContentType;
use crate::infrastructure::constants::KIND_LIST;
use crate::infrastructure::recipe::raw::RawObject;
use crate::shared::error::DecodeError;
use serde::Deserialize;
use serde_yaml::Value;

/// Turns recipe text into an ordered sequence of raw objects.
pub trait Decoder: Send + Sync {
    fn decode(&self, content: &str, content_type: ContentType)
        -> Result<Vec<RawObject>, DecodeError>;
}

/// Decoder for YAML recipes.
///
/// Accepts multi-document streams and flattens `kind: List` documents into
/// their items. Empty documents are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlDecoder;

impl YamlDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for YamlDecoder {
    fn decode(
        &self,
        content: &str,
        _content_type: ContentType,
    ) -> Result<Vec<RawObject>, DecodeError> {
        let mut objects = Vec::new();

        for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
            let value = Value::deserialize(document)?;
            if value.is_null() {
                continue;
            }
            collect_objects(value, index, &mut objects)?;
        }

        Ok(objects)
    }
}

fn collect_objects(
    value: Value,
    index: usize,
    objects: &mut Vec<RawObject>,
) -> Result<(), DecodeError> {
    let Value::Mapping(map) = value else {
        return Err(DecodeError::NotAnObject { index });
    };

    let is_list = map
        .get("kind")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind == KIND_LIST);

    if !is_list {
        objects.push(RawObject::from(map));
        return Ok(());
    }

    match map.get("items") {
        Some(Value::Sequence(items)) => {
            for item in items {
                collect_objects(item.clone(), index, objects)?;
            }
            Ok(())
        }
        None | Some(Value::Null) => Ok(()),
        Some(_) => Err(DecodeError::NotAnObject { index }),
    }
}
