//! swaggerdrill-runner: payload synthesis and sequential endpoint execution

pub mod driver;
pub mod loader;
pub mod synth;

pub use driver::store::{HttpResultStore, ResultSink, StoreError};
pub use driver::transport::{
    HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError,
};
pub use driver::{RunnerError, TestRunner};
pub use loader::{LoadError, SpecSource, load_endpoints, load_spec};
pub use synth::{SchemaNode, synthesize};
