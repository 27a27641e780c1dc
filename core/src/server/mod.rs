mod stdio;
mod traits;
mod transport;

pub use stdio::{run_stdio, serve, READY_LINE};
pub use traits::{
    ApiClient, ApiMethod, ApiRequest, ClientFactory, EngineArgs, ProtocolEngine, ServerFactory,
    SharedClient, Translator,
};
pub use transport::{BoxedReader, BoxedWriter, TransportPair};
