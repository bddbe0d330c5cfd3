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

//! Declarative parameter constraints checked before a request is built.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: parameter={target} constraint={rule} value={value} details: {details}")]
pub struct ValidationError {
    pub target: &'static str,
    pub rule: &'static str,
    pub value: String,
    pub details: String,
}

/// Value a constraint is checked against
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Str(&'a str),
    /// Only records whether an optional field is set
    Presence(bool),
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Str(s) => write!(f, "{s:?}"),
            Target::Presence(true) => f.write_str("<set>"),
            Target::Presence(false) => f.write_str("<nil>"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Rule<'a> {
    MinLength(usize),
    MaxLength(usize),
    /// Value must be set
    NotNull,
    /// Value may be absent; when it is set, the chained constraints apply
    Nullable(Vec<Constraint<'a>>),
}

impl Rule<'_> {
    fn name(&self) -> &'static str {
        match self {
            Rule::MinLength(_) => "MinLength",
            Rule::MaxLength(_) => "MaxLength",
            Rule::NotNull | Rule::Nullable(_) => "Null",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Constraint<'a> {
    pub target: &'static str,
    pub value: Target<'a>,
    pub rule: Rule<'a>,
}

impl<'a> Constraint<'a> {
    pub fn new(target: &'static str, value: Target<'a>, rule: Rule<'a>) -> Self {
        Self {
            target,
            value,
            rule,
        }
    }

    fn fail(&self, details: String) -> ValidationError {
        ValidationError {
            target: self.target,
            rule: self.rule.name(),
            value: self.value.to_string(),
            details,
        }
    }

    fn check(&self) -> Result<(), ValidationError> {
        match (&self.rule, self.value) {
            (Rule::MinLength(min), Target::Str(s)) if s.chars().count() < *min => Err(self.fail(
                format!("value length must be greater than or equal to {min}"),
            )),
            (Rule::MaxLength(max), Target::Str(s)) if s.chars().count() > *max => {
                Err(self.fail(format!("value length must be less than or equal to {max}")))
            }
            (Rule::NotNull, Target::Presence(false)) => {
                Err(self.fail("value can not be null; required parameter".to_owned()))
            }
            (Rule::Nullable(chain), Target::Presence(true)) => validate(chain),
            _ => Ok(()),
        }
    }
}

/// Check all constraints in order, stopping at the first violation
pub fn validate(constraints: &[Constraint<'_>]) -> Result<(), ValidationError> {
    constraints.iter().try_for_each(Constraint::check)
}

/// Length constraints shared by the resource group and workspace name
/// parameters of the resource manager APIs
pub fn name_length<'a>(target: &'static str, value: &'a str) -> [Constraint<'a>; 2] {
    [
        Constraint::new(target, Target::Str(value), Rule::MaxLength(90)),
        Constraint::new(target, Target::Str(value), Rule::MinLength(1)),
    ]
}
