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

use super::*;

/// Device files are only ever read by this crate (routing and analysis both
/// consume a device's tiles/wires/sites, nothing writes one back out), so
/// unlike `phys_netlist` this module carries no `Builder`/`write` side.
pub type Root<'a> = DeviceResources_capnp::device::Reader<'a>;
