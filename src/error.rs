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

use std::fmt;
use std::io;
use thiserror::Error as ThisError;

/// Shorthand for `std::result::Result<T, Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;

/// What was being attempted when an [`Error`] occurred. Purely diagnostic;
/// it never changes how a caller should react, only what gets printed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Operation {
    Read,
    Write,
    Seek,
    Size,
    Truncate,
    Close,
    Find,
    Chunk,
    Frame,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Seek => "seek",
            Operation::Size => "size",
            Operation::Truncate => "truncate",
            Operation::Close => "close",
            Operation::Find => "find",
            Operation::Chunk => "chunked transfer coding",
            Operation::Frame => "message body framing",
        })
    }
}

/// What went wrong, independent of which [`Operation`] was in progress.
#[derive(Debug, ThisError)]
pub enum ErrorKind {
    #[error("capability is not supported by this stream")]
    Unsupported,
    #[error("stream is closed")]
    Closed,
    #[error("transport error")]
    Transport(#[from] io::Error),
    #[error("delimiter not found within the sanity limit")]
    DelimiterNotFound,
    #[error("malformed chunk size line {0:?}")]
    MalformedChunk(String),
    #[error("body ended before the declared length was reached")]
    TruncatedBody,
    #[error("unknown transfer coding {0:?}")]
    UnknownTransferCoding(String),
    #[error("unsupported transfer coding {0:?}")]
    UnsupportedTransferCoding(String),
    #[error(
        "response body is delimited by connection close, \
        but no `Connection: close` token was present"
    )]
    MissingCloseForDelimitedBody,
}

/// An [`Operation`]-tagged [`ErrorKind`].
#[derive(Debug, ThisError)]
#[error("{op}: {kind}")]
pub struct Error {
    op: Operation,
    #[source]
    kind: ErrorKind,
}

impl Error {
    pub fn new(op: Operation, kind: ErrorKind) -> Self {
        Self { op, kind }
    }

    pub fn unsupported(op: Operation) -> Self {
        Self::new(op, ErrorKind::Unsupported)
    }

    pub fn closed(op: Operation) -> Self {
        Self::new(op, ErrorKind::Closed)
    }

    pub fn operation(&self) -> Operation {
        self.op
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

/// Attaches an [`Operation`] to a bare `ErrorKind`-flavoured result,
/// mirroring the `OperationKind`-tagged error `orio::streams` builds on.
pub trait Context<T> {
    fn context(self, op: Operation) -> Result<T>;
}

impl<T> Context<T> for std::result::Result<T, ErrorKind> {
    fn context(self, op: Operation) -> Result<T> {
        self.map_err(|kind| Error::new(op, kind))
    }
}

impl<T> Context<T> for std::result::Result<T, io::Error> {
    fn context(self, op: Operation) -> Result<T> {
        self.map_err(|e| Error::new(op, ErrorKind::Transport(e)))
    }
}
