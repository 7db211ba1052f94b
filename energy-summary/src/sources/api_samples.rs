use std::time::SystemTime;

use async_stream::try_stream;
use futures::StreamExt;
use samples_client::{
    domain::{Query, Sample},
    SamplesApi,
};

use crate::pipeline::{Envelope, EnvelopeStream, PipelineError, Source};

/// Streams the samples of one query, page by page, in page-arrival order.
///
/// A failed page ends the stream with a `PipelineError::Fetch`; nothing is
/// retried.
pub struct ApiSamplesSource {
    api: SamplesApi,
    query: Query,
}

impl ApiSamplesSource {
    pub fn new(api: SamplesApi, query: Query) -> Self {
        Self { api, query }
    }
}

#[async_trait::async_trait]
impl Source<Sample> for ApiSamplesSource {
    async fn stream(&self) -> EnvelopeStream<Sample> {
        let mut pages = self.api.pages(&self.query);

        let s = try_stream! {
            while let Some(page) = pages.next().await {
                let page = page.map_err(PipelineError::from)?;
                let received_at = SystemTime::now();

                for sample in page.samples {
                    yield Envelope {
                        payload: sample,
                        received_at,
                    };
                }
            }
        };

        Box::pin(s)
    }
}
