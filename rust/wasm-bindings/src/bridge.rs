// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hands `!Send` browser futures to the `Send` core.
//!
//! The JS future runs on the local executor and reports through a oneshot.
//! Dropping the returned future drops the cancel sender, which ends the
//! local task and with it the JS-side work (timers are cleared on drop).

use std::future::Future;

use futures_channel::oneshot;
use futures_util::future::{self, BoxFuture, Either, FutureExt};
use wasm_bindgen_futures::spawn_local;

/// Run `task` on the local executor. Resolves to `None` only if the local
/// task went away without producing a value.
pub fn bridge<F>(task: F) -> BoxFuture<'static, Option<F::Output>>
where
    F: Future + 'static,
    F::Output: Send + 'static,
{
    let (result_tx, result_rx) = oneshot::channel();
    let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

    spawn_local(async move {
        match future::select(Box::pin(task), cancel_rx).await {
            Either::Left((value, _)) => {
                let _ = result_tx.send(value);
            }
            Either::Right(_) => {}
        }
    });

    async move {
        let _cancel_on_drop = cancel_tx;
        result_rx.await.ok()
    }
    .boxed()
}
