//! # Lambda Adapter
//!
//! Runs the dispatcher inside the AWS Lambda runtime. The trigger payload
//! deserializes directly into [`InboundEvent`] and the envelope is returned
//! as the function result.

use std::sync::Arc;

use lambda_runtime::{service_fn, Error as LambdaError, LambdaEvent};

use crate::movies::{Dispatcher, InboundEvent, ResponseEnvelope};
use crate::observability::Logger;
use crate::store::RecordStore;

/// Serve invocations until the runtime shuts down
pub async fn run<S: RecordStore + 'static>(dispatcher: Dispatcher<S>) -> Result<(), LambdaError> {
    let dispatcher = Arc::new(dispatcher);
    let func = service_fn(move |event: LambdaEvent<InboundEvent>| {
        let dispatcher = Arc::clone(&dispatcher);
        async move { Ok::<_, LambdaError>(handle(&dispatcher, event).await) }
    });

    Logger::info("MOVIES_LAMBDA_STARTED", &[]);
    lambda_runtime::run(func).await
}

/// Handle one invocation
pub async fn handle<S: RecordStore>(
    dispatcher: &Dispatcher<S>,
    event: LambdaEvent<InboundEvent>,
) -> ResponseEnvelope {
    let (payload, context) = event.into_parts();
    Logger::trace(
        "MOVIES_LAMBDA_INVOCATION",
        &[("request_id", context.request_id.as_str())],
    );
    dispatcher.handle(payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use lambda_runtime::Context;
    use serde_json::json;

    #[tokio::test]
    async fn test_handle_proxy_payload() {
        let dispatcher = Dispatcher::new(InMemoryStore::new());
        let payload: InboundEvent = serde_json::from_value(json!({
            "httpMethod": "GET",
            "queryStringParameters": null,
            "requestContext": {"requestId": "abc"}
        }))
        .unwrap();

        let envelope = handle(&dispatcher, LambdaEvent::new(payload, Context::default())).await;
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.body_json().unwrap(), json!({"movies": []}));
    }
}
