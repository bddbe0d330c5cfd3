// This file is part of the terraform-provider-azmonitor project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
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

//! Resource manager ids built from templates of static and user segments.

use std::fmt;

use crate::utils::DisplayJoinable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Fixed text, e.g. `resourceGroups`
    Static(&'static str),
    /// Value supplied by the user, e.g. `resourceGroupName`
    User(&'static str),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(s) => f.write_str(s),
            Segment::User(name) => write!(f, "{{{name}}}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceIdError {
    #[error("parsing {kind} ID {input:?}: the segment at position {position} didn't match: expected {expected:?} but got {actual:?}\n\nthe ID should be in the format {format}")]
    Mismatch {
        kind: &'static str,
        input: String,
        position: usize,
        expected: &'static str,
        actual: String,
        format: String,
    },
    #[error("parsing {kind} ID {input:?}: the segment {segment} was not found\n\nthe ID should be in the format {format}")]
    Missing {
        kind: &'static str,
        input: String,
        segment: String,
        format: String,
    },
    #[error("parsing {kind} ID {input:?}: unexpected trailing segments {trailing:?}\n\nthe ID should be in the format {format}")]
    Trailing {
        kind: &'static str,
        input: String,
        trailing: String,
        format: String,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub struct ResourceIdTemplate {
    /// Human readable kind, used in error messages
    pub kind: &'static str,
    pub segments: &'static [Segment],
}

/// Id parsed against a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedId {
    template: &'static ResourceIdTemplate,
    values: Vec<String>,
}

impl ResourceIdTemplate {
    /// Format of the ids, e.g. `/subscriptions/{subscriptionId}`
    pub fn format(&self) -> String {
        format!("/{}", self.segments.iter().join_with("/"))
    }

    /// Parse an id whose static segments match exactly
    pub fn parse(&'static self, input: &str) -> Result<ParsedId, ResourceIdError> {
        self.parse_with(input, false)
    }

    /// Parse an id whose static segments may differ in case.
    /// The parsed id is rendered back with the canonical casing.
    pub fn parse_insensitively(&'static self, input: &str) -> Result<ParsedId, ResourceIdError> {
        self.parse_with(input, true)
    }

    fn parse_with(
        &'static self,
        input: &str,
        insensitive: bool,
    ) -> Result<ParsedId, ResourceIdError> {
        let mut parts = input.strip_prefix('/').unwrap_or(input).split('/');
        let mut values = Vec::new();

        for (position, segment) in self.segments.iter().enumerate() {
            let part = parts.next().filter(|part| !part.is_empty());
            match (segment, part) {
                (_, None) => {
                    return Err(ResourceIdError::Missing {
                        kind: self.kind,
                        input: input.to_owned(),
                        segment: segment.to_string(),
                        format: self.format(),
                    })
                }
                (Segment::Static(expected), Some(actual)) => {
                    let matches = if insensitive {
                        expected.eq_ignore_ascii_case(actual)
                    } else {
                        *expected == actual
                    };
                    if !matches {
                        return Err(ResourceIdError::Mismatch {
                            kind: self.kind,
                            input: input.to_owned(),
                            position,
                            expected: *expected,
                            actual: actual.to_owned(),
                            format: self.format(),
                        });
                    }
                }
                (Segment::User(_), Some(actual)) => values.push(actual.to_owned()),
            }
        }

        let trailing = parts.collect::<Vec<_>>().join("/");
        if !trailing.is_empty() {
            return Err(ResourceIdError::Trailing {
                kind: self.kind,
                input: input.to_owned(),
                trailing,
                format: self.format(),
            });
        }

        Ok(ParsedId {
            template: self,
            values,
        })
    }
}

impl ParsedId {
    /// Value of a user segment
    pub fn get(&self, name: &str) -> Option<&str> {
        self.template
            .segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::User(user) => Some(*user),
                Segment::Static(_) => None,
            })
            .zip(&self.values)
            .find(|(user, _)| *user == name)
            .map(|(_, value)| value.as_str())
    }

    /// Canonical form of the id
    pub fn id(&self) -> String {
        let mut values = self.values.iter();
        let mut id = String::new();
        for segment in self.template.segments {
            id.push('/');
            match segment {
                Segment::Static(s) => id.push_str(s),
                Segment::User(_) => id.push_str(values.next().map_or("", String::as_str)),
            }
        }
        id
    }
}

impl fmt::Display for ParsedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

pub static EVENTHUB_AUTHORIZATION_RULE: ResourceIdTemplate = ResourceIdTemplate {
    kind: "Authorization Rule",
    segments: &[
        Segment::Static("subscriptions"),
        Segment::User("subscriptionId"),
        Segment::Static("resourceGroups"),
        Segment::User("resourceGroupName"),
        Segment::Static("providers"),
        Segment::Static("Microsoft.EventHub"),
        Segment::Static("namespaces"),
        Segment::User("namespaceName"),
        Segment::Static("authorizationRules"),
        Segment::User("authorizationRuleName"),
    ],
};

pub static LOG_ANALYTICS_WORKSPACE: ResourceIdTemplate = ResourceIdTemplate {
    kind: "Workspace",
    segments: &[
        Segment::Static("subscriptions"),
        Segment::User("subscriptionId"),
        Segment::Static("resourceGroups"),
        Segment::User("resourceGroupName"),
        Segment::Static("providers"),
        Segment::Static("Microsoft.OperationalInsights"),
        Segment::Static("workspaces"),
        Segment::User("workspaceName"),
    ],
};

pub static STORAGE_ACCOUNT: ResourceIdTemplate = ResourceIdTemplate {
    kind: "Storage Account",
    segments: &[
        Segment::Static("subscriptions"),
        Segment::User("subscriptionId"),
        Segment::Static("resourceGroups"),
        Segment::User("resourceGroupName"),
        Segment::Static("providers"),
        Segment::Static("Microsoft.Storage"),
        Segment::Static("storageAccounts"),
        Segment::User("storageAccountName"),
    ],
};
