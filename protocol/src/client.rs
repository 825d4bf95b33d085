// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{CallHandle, CallbackQueue};
use reqapi_core::Result;
use std::future::Future;

/// Callback style access to a service client.
///
/// Every client exposes its operations as `async fn`s. This trait adds a
/// way to start a call without awaiting it: the result is handed to a
/// callback on the client's [`CallbackQueue`], so callbacks of one client
/// never run concurrently.
pub trait ServiceClient: Clone + Send + Sync + 'static {
    /// The queue callbacks of this client run on.
    fn callback_queue(&self) -> Result<CallbackQueue>;

    /// Start `call` on a clone of this client and hand its result to
    /// `callback`.
    ///
    /// ```no_run
    /// # use reqapi_protocol::{CallbackQueue, ServiceClient, SharedQueue};
    /// # #[derive(Clone)]
    /// # struct Client(SharedQueue);
    /// # impl Client { async fn ping(&self) -> u32 { 1 } }
    /// # impl ServiceClient for Client {
    /// #     fn callback_queue(&self) -> reqapi_core::Result<CallbackQueue> { self.0.get() }
    /// # }
    /// # fn example(client: Client) -> reqapi_core::Result<()> {
    /// let handle = client.spawn(
    ///     |c| async move { c.ping().await },
    ///     |pong| println!("pong: {pong}"),
    /// )?;
    /// handle.abort();
    /// # Ok(())
    /// # }
    /// ```
    fn spawn<F, Fut, C>(&self, call: F, callback: C) -> Result<CallHandle>
    where
        F: FnOnce(Self) -> Fut,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
        C: FnOnce(Fut::Output) + Send + 'static,
    {
        let queue = self.callback_queue()?;
        Ok(queue.submit(call(self.clone()), callback))
    }
}
