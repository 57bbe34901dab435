//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# steplog

steplog is an opinionated decision-log library for Rust.

# The problem

Log files answer "what happened to the process". They are bad at
answering "what did this one request decide, and why" — which validation
checks ran, which pricing branch fired, what the approval outcome was.
That record wants to be an ordered, labeled, per-unit-of-work artifact
you can store next to the work itself and audit later, not lines
interleaved with every other request in a shared sink.

steplog accumulates exactly that: an append-only sequence of labeled
observations, grouped into named sections, closed into a flat list of
formatted strings in strict chronological order.

# The API

Three interchangeable ways to thread the state, all producing
byte-identical output for equivalent call sequences:

| Style       | Surface         | State lives in                             |
|-------------|-----------------|--------------------------------------------|
| ambient     | [`ambient`]     | a thread-local slot, no handle threading   |
| functional  | [`Log`] methods | an explicit value you pass and return      |
| intercepted | [`intercept`]   | the ambient slot, tagged at function entry |

```rust
use steplog::{ambient, debug_format};

ambient::start_tag("validation");
ambient::log("input_valid", true);
ambient::tag("authorization");
ambient::log("user_role", "admin".to_string());

assert_eq!(
    ambient::close(debug_format),
    vec![
        "validation_input_valid: true".to_string(),
        "authorization_user_role: \"admin\"".to_string(),
    ]
);
```

The same session, functional style:

```rust
use steplog::{debug_format, Log};

let lines = Log::with_tag("validation")
    .append("input_valid", true)
    .tag("authorization")
    .append("user_role", "admin".to_string())
    .close(debug_format);
# assert_eq!(lines.len(), 2);
```

# Values and formatting

Any `Debug + Send + Sync` value can be logged. Rendering happens at close
time: a default formatter (usually [`debug_format`]) applies to every
entry, except entries logged with their own formatter, which always wins.
See [`Value`].

# Storage

[`compress`] joins the closed entries with `"\n"` and runs them through
zlib, skipping the codec for payloads too small to benefit. The bytes are
decodable by any standard zlib inflate.

# Multithreading

The ambient slot is strictly per-thread; two threads never share a log.
To move a session across threads, or to fork it into divergent branches,
use the functional API — a [`Log`] is an ordinary cloneable value.

# Limitations, on purpose

The serialized format does not escape `": "` or `"\n"` occurring inside
rendered values; parsers splitting on those must tolerate the ambiguity.
The crate guarantees structure (ordering, labeling, reversible encoding),
not durability or semantic validation of what you log.
*/

pub mod ambient;
pub mod compress;
pub mod intercept;

mod functional;
mod model;
mod serialize;
mod value;

pub use compress::{MinSize, Payload};
pub use model::{Entry, Log, Section, DEFAULT_TAG};
pub use value::{debug_format, Value, ValueFormatter};
