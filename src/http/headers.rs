// Copyright 2023 Strixpyrr
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

use std::collections::HashSet;

/// An HTTP request method. `Other` covers extension methods the parser
/// doesn't special-case.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Method {
    Get,
    Head,
    Trace,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Patch,
    Other(String),
}

/// A single `Transfer-Encoding` token with its (unparsed) parameters, e.g.
/// `chunked` or `gzip;q=0.5`.
#[derive(Clone, Debug)]
pub struct TransferCoding {
    pub token: String,
    pub params: Vec<(String, String)>,
}

impl TransferCoding {
    pub fn identity(token: impl Into<String>) -> Self {
        Self { token: token.into(), params: Vec::new() }
    }
}

/// The subset of general headers the body framer reads.
#[derive(Clone, Debug, Default)]
pub struct GeneralHeaders {
    pub transfer_encoding: Vec<TransferCoding>,
    pub connection: HashSet<String>,
}

/// The subset of entity headers the body framer reads.
#[derive(Copy, Clone, Debug, Default)]
pub struct EntityHeaders {
    pub content_length: Option<u64>,
}
