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

use std::cell::RefCell;
use std::rc::Rc;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::stream::{Stream, Whence};

type Callback0 = Box<dyn FnOnce()>;
type CallbackErr = Box<dyn FnOnce(&Error)>;

/// A callback that fires at most once, however many events reach it.
/// `get_stream` binds the same logical "body finished" callback to both
/// `on_eof` and `on_close` (mirroring `notifyOnClose = notifyOnEof` in the
/// original `HTTP::Connection::getStream`); since a caller could plausibly
/// trigger both, `OnDone` guards the inner closure so it only ever runs
/// once, which is what the "exactly once" testable property actually
/// requires.
#[derive(Clone)]
pub struct OnDone(Rc<RefCell<Option<Callback0>>>);

impl OnDone {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    pub fn fire(&self) {
        if let Some(f) = self.0.borrow_mut().take() {
            f();
        }
    }
}

/// Wraps a parent stream, invoking registered callbacks at most once each
/// when end-of-stream, close, or an error is observed.
pub struct NotifyStream<S> {
    parent: S,
    on_eof: Option<Callback0>,
    on_close: Option<Callback0>,
    on_exception: Option<CallbackErr>,
}

impl<S: Stream> NotifyStream<S> {
    pub fn new(parent: S) -> Self {
        Self { parent, on_eof: None, on_close: None, on_exception: None }
    }

    pub fn on_eof(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_eof = Some(Box::new(f));
        self
    }

    pub fn on_close(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    pub fn on_exception(mut self, f: impl FnOnce(&Error) + 'static) -> Self {
        self.on_exception = Some(Box::new(f));
        self
    }

    fn notify_exception(&mut self, e: &Error) {
        if let Some(f) = self.on_exception.take() {
            f(e);
        }
    }
}

impl<S: Stream> Stream for NotifyStream<S> {
    fn can_read(&self) -> bool {
        self.parent.can_read()
    }

    fn can_write(&self) -> bool {
        self.parent.can_write()
    }

    fn can_seek(&self) -> bool {
        self.parent.can_seek()
    }

    fn can_size(&self) -> bool {
        self.parent.can_size()
    }

    fn can_truncate(&self) -> bool {
        self.parent.can_truncate()
    }

    fn can_find_delimited(&self) -> bool {
        self.parent.can_find_delimited()
    }

    fn read(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        match self.parent.read(buf, n) {
            Ok(0) => {
                if let Some(f) = self.on_eof.take() {
                    f();
                }
                Ok(0)
            }
            Ok(got) => Ok(got),
            Err(e) => {
                self.notify_exception(&e);
                Err(e)
            }
        }
    }

    fn write(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        match self.parent.write(buf, n) {
            Ok(n) => Ok(n),
            Err(e) => {
                self.notify_exception(&e);
                Err(e)
            }
        }
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.parent.seek(offset, whence)
    }

    fn size(&self) -> Result<u64> {
        self.parent.size()
    }

    fn truncate(&mut self, n: u64) -> Result {
        self.parent.truncate(n)
    }

    fn find(&mut self, byte: u8, sanity_limit: usize, throw_if_missing: bool) -> Result<i64> {
        self.parent.find(byte, sanity_limit, throw_if_missing)
    }

    fn close(&mut self) -> Result {
        let result = self.parent.close();
        if let Some(f) = self.on_close.take() {
            f();
        }
        if let Err(e) = &result {
            self.notify_exception(e);
        }
        result
    }
}
