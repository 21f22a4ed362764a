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

use crate::segment::Segment;
use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "shared-pool")] {
        use std::sync::{Arc, Mutex};

        #[derive(Clone)]
        pub struct Pool {
            free: Arc<Mutex<Vec<Segment>>>,
        }

        impl Pool {
            pub fn new() -> Self {
                Self { free: Arc::new(Mutex::new(Vec::new())) }
            }

            fn with_free<R>(&self, f: impl FnOnce(&mut Vec<Segment>) -> R) -> R {
                f(&mut self.free.lock().expect("segment pool mutex poisoned"))
            }
        }
    } else {
        use std::cell::RefCell;
        use std::rc::Rc;

        #[derive(Clone)]
        pub struct Pool {
            free: Rc<RefCell<Vec<Segment>>>,
        }

        impl Pool {
            pub fn new() -> Self {
                Self { free: Rc::new(RefCell::new(Vec::new())) }
            }

            fn with_free<R>(&self, f: impl FnOnce(&mut Vec<Segment>) -> R) -> R {
                f(&mut self.free.borrow_mut())
            }
        }
    }
}

impl Pool {
    /// Claims a segment with at least `min_size` bytes of capacity,
    /// reusing a recycled one if one is large enough, else allocating a
    /// fresh one sized to at least [`SEGMENT_SIZE`](crate::segment::SEGMENT_SIZE).
    pub fn claim(&self, min_size: usize) -> Segment {
        let reused = self.with_free(|free| {
            free.iter()
                .position(|s| s.capacity() >= min_size)
                .map(|i| free.swap_remove(i))
        });
        match reused {
            Some(mut seg) => {
                seg.reset();
                seg
            }
            None => Segment::with_capacity(min_size.max(crate::segment::SEGMENT_SIZE)),
        }
    }

    /// Returns a segment to the pool for reuse, unless another handle still
    /// shares its backing region.
    pub fn recycle(&self, seg: Segment) {
        if !seg.is_shared() {
            self.with_free(|free| free.push(seg));
        }
    }

    pub fn recycle_all(&self, segs: impl IntoIterator<Item = Segment>) {
        for seg in segs {
            self.recycle(seg);
        }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    /// The default, per-thread pool `Buffer::default()` draws from. With
    /// the `shared-pool` feature this is still one pool per thread, each
    /// sharing the same underlying `Arc<Mutex<_>>` free list only once a
    /// `Pool` has been cloned across threads explicitly; the thread-local
    /// slot here just avoids requiring callers to thread a `Pool` through
    /// by hand for the common case.
    static DEFAULT_POOL: Pool = Pool::new();
}

pub fn default_pool() -> Pool {
    DEFAULT_POOL.with(Pool::clone)
}
