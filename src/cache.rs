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

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Mutex;

/// A marker type naming one slot in a [`Cache`]; its associated `Value` is
/// what gets stored under that slot.
pub trait CacheKey: 'static {
    type Value: Send + 'static;
}

/// A typed, polymorphic per-connection registry, letting upper layers stash
/// parsed or derived state (keep-alive policy, negotiated options) next to
/// a connection without the core depending on those layers' types.
#[derive(Default)]
pub struct Cache {
    slots: Mutex<HashMap<TypeId, Box<dyn Any + Send>>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<K: CacheKey>(&self) -> Option<K::Value>
    where
        K::Value: Clone,
    {
        let slots = self.slots.lock().expect("cache mutex poisoned");
        slots
            .get(&TypeId::of::<K>())
            .and_then(|v| v.downcast_ref::<K::Value>())
            .cloned()
    }

    pub fn set<K: CacheKey>(&self, value: K::Value) {
        let mut slots = self.slots.lock().expect("cache mutex poisoned");
        slots.insert(TypeId::of::<K>(), Box::new(value));
    }

    pub fn remove<K: CacheKey>(&self) {
        let mut slots = self.slots.lock().expect("cache mutex poisoned");
        slots.remove(&TypeId::of::<K>());
    }
}
