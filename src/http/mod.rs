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

//! HTTP/1.x message-body framing (RFC 2616 §4.4), built on the stream and
//! buffer substrate. The header-line grammar itself is an external
//! collaborator; this module only consumes already-parsed header views.

mod framer;
mod headers;

pub use framer::{ensure_searchable, get_stream, has_message_body};
pub use headers::{EntityHeaders, GeneralHeaders, Method, TransferCoding};
