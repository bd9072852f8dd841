/* Copyright (C) 2022 Antmicro
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     https://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::cell::RefCell;

/// Lazily-caching wrapper around a capnp `List<Text>` string table.
///
/// Every FIF message we touch interns strings by index, and looking a string
/// up through capnp decodes it fresh each time. Benchmarks route through the
/// same few hundred strings millions of times, so cache the decoded `&str`
/// the first time each index is touched.
pub struct StringTable<'a> {
    list: capnp::text_list::Reader<'a>,
    cache: RefCell<Vec<Option<&'a str>>>,
}

impl<'a> StringTable<'a> {
    pub fn new(list: capnp::text_list::Reader<'a>) -> Self {
        let len = list.len() as usize;
        Self {
            list,
            cache: RefCell::new(vec![None; len]),
        }
    }

    pub fn get(&self, idx: u32) -> &'a str {
        if let Some(s) = self.cache.borrow()[idx as usize] {
            return s;
        }
        let s = self.list.get(idx).unwrap();
        self.cache.borrow_mut()[idx as usize] = Some(s);
        s
    }

    pub fn len(&self) -> usize {
        self.list.len() as usize
    }
}
