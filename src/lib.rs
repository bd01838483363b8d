//
// Copyright © 2025 Hardcore Engineering Inc.
//
// Licensed under the Eclipse Public License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License. You may
// obtain a copy of the License at https://www.eclipse.org/legal/epl-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//
// See the License for the specific language governing permissions and
// limitations under the License.
//

pub use reqwest::StatusCode;

mod config;
pub mod reports;
pub mod services;

pub use config::Config;
pub use services::ServiceFactory;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ApiError: {0}")]
    Api(#[from] services::ApiError),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    ReqwestMiddleware(#[from] reqwest_middleware::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    HttpError(reqwest::StatusCode, String),

    #[error(transparent)]
    Config(#[from] ::config::ConfigError),

    /// The first leg of a two-request vehicle move succeeded and the second
    /// failed, leaving the vehicle attached to no branch.
    #[error("vehicle {0} was removed from its branch but not re-added")]
    VehicleDetached(String, #[source] Box<Error>),

    #[error("{0}")]
    Other(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn optional_rounded_float<'de, D, T: num_traits::FromPrimitive>(
    deserializer: D,
) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    if let Some(float) = Option::<f64>::deserialize(deserializer)? {
        T::from_f64(float.round()).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "Cannot convert {} to {}",
                float,
                std::any::type_name::<T>()
            ))
        })
    } else {
        Ok(None)
    }
}
