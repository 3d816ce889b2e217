//! The generic adapter: map, send once, wrap the result

use std::sync::Arc;

use crate::descriptor::Descriptor;
use crate::envelope::{Envelope, OutputMode, RenderFn};
use crate::error::AdapterResult;
use crate::mapper::{map_request, Credential, QueryParams};
use crate::schema::EngineSchema;
use crate::transport::Transport;

/// An engine schema paired with its readable renderer
#[derive(Clone, Copy)]
pub struct Engine {
    pub schema: EngineSchema,
    pub render: RenderFn,
}

impl Engine {
    pub fn tool(&self) -> &'static str {
        self.schema.tool
    }
}

/// Runs any [`Engine`] against one transport with one credential
#[derive(Clone)]
pub struct Adapter {
    transport: Arc<dyn Transport>,
    credential: Option<Credential>,
}

impl Adapter {
    pub fn new(transport: Arc<dyn Transport>, credential: Credential) -> Self {
        Self {
            transport,
            credential: Some(credential),
        }
    }

    /// Adapter for providers that take no API key
    pub fn anonymous(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            credential: None,
        }
    }

    /// Validate and map without sending anything
    pub fn prepare(&self, engine: &Engine, descriptor: &Descriptor) -> AdapterResult<QueryParams> {
        map_request(&engine.schema, descriptor, self.credential.as_ref())
    }

    /// One full invocation: validate, send a single request, wrap the reply
    pub async fn invoke(&self, engine: &Engine, descriptor: Descriptor) -> AdapterResult<Envelope> {
        let mode = OutputMode::from_descriptor(&descriptor)?;
        let query = self.prepare(engine, &descriptor)?;

        tracing::info!(
            tool = engine.tool(),
            transport = self.transport.name(),
            ?mode,
            "Sending request"
        );

        let document = self.transport.get(engine.schema.endpoint, &query).await?;
        Ok(Envelope::new(document, engine.render, mode))
    }
}
