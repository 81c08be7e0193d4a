// This file mirrors what `tonic-build`/`prost-build` generate from
// `proto/settlement.proto`. It is checked in rather than generated at build
// time in every environment, the same way `azure-functions-rs` caches its
// generated `azure_functions_rpc_messages.rs`. Regenerate with
// `cargo build` when a `protoc` toolchain is on `PATH` (see `build.rs`).
#![allow(clippy::derive_partial_eq_without_eq, missing_docs, missing_debug_implementations)]

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Empty {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NullableString {
    #[prost(oneof = "nullable_string::String", tags = "1")]
    pub string: ::std::option::Option<nullable_string::String>,
}
pub mod nullable_string {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum String {
        #[prost(string, tag = "1")]
        Value(::prost::alloc::string::String),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LockTokenRequest {
    #[prost(string, tag = "1")]
    pub locktoken: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PropertiesRequest {
    #[prost(string, tag = "1")]
    pub locktoken: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub properties_to_modify: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeadletterRequest {
    #[prost(string, tag = "1")]
    pub locktoken: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub properties_to_modify: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub deadletter_reason: ::std::option::Option<NullableString>,
    #[prost(message, optional, tag = "4")]
    pub deadletter_error_description: ::std::option::Option<NullableString>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetSessionStateRequest {
    #[prost(string, tag = "1")]
    pub session_id: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub session_state: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SessionRequest {
    #[prost(string, tag = "1")]
    pub session_id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RenewSessionLockResponse {
    #[prost(oneof = "renew_session_lock_response::LockedUntil", tags = "1")]
    pub locked_until: ::std::option::Option<renew_session_lock_response::LockedUntil>,
}
pub mod renew_session_lock_response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum LockedUntil {
        #[prost(int64, tag = "1")]
        LockedUntilUnixMillis(i64),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RenewMessageLockResponse {
    #[prost(oneof = "renew_message_lock_response::LockedUntil", tags = "1")]
    pub locked_until: ::std::option::Option<renew_message_lock_response::LockedUntil>,
}
pub mod renew_message_lock_response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum LockedUntil {
        #[prost(int64, tag = "1")]
        LockedUntilUnixMillis(i64),
    }
}

/// Generated client code, modeled on `tonic-build`'s default output.
pub mod settlement_client {
    use tonic::codegen::*;

    #[derive(Debug, Clone)]
    pub struct SettlementClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl SettlementClient<tonic::transport::Channel> {
        /// Attempts to create a new client by connecting to a given endpoint.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }

    impl<T> SettlementClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        pub fn with_max_message_length(inner: T, limit: usize) -> Self {
            let inner = tonic::client::Grpc::new(inner)
                .max_decoding_message_size(limit)
                .max_encoding_message_size(limit);
            Self { inner }
        }

        async fn ready(&mut self) -> Result<(), tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })
        }

        pub async fn complete(
            &mut self,
            request: impl tonic::IntoRequest<super::LockTokenRequest>,
        ) -> Result<tonic::Response<super::Empty>, tonic::Status> {
            self.ready().await?;
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/azurefunctions.extensions.servicebus.settlement.Settlement/Complete",
            );
            let codec = tonic::codec::ProstCodec::default();
            self.inner
                .unary(request.into_request(), path, codec)
                .await
        }

        pub async fn abandon(
            &mut self,
            request: impl tonic::IntoRequest<super::PropertiesRequest>,
        ) -> Result<tonic::Response<super::Empty>, tonic::Status> {
            self.ready().await?;
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/azurefunctions.extensions.servicebus.settlement.Settlement/Abandon",
            );
            let codec = tonic::codec::ProstCodec::default();
            self.inner
                .unary(request.into_request(), path, codec)
                .await
        }

        pub async fn deadletter(
            &mut self,
            request: impl tonic::IntoRequest<super::DeadletterRequest>,
        ) -> Result<tonic::Response<super::Empty>, tonic::Status> {
            self.ready().await?;
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/azurefunctions.extensions.servicebus.settlement.Settlement/Deadletter",
            );
            let codec = tonic::codec::ProstCodec::default();
            self.inner
                .unary(request.into_request(), path, codec)
                .await
        }

        pub async fn defer(
            &mut self,
            request: impl tonic::IntoRequest<super::PropertiesRequest>,
        ) -> Result<tonic::Response<super::Empty>, tonic::Status> {
            self.ready().await?;
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/azurefunctions.extensions.servicebus.settlement.Settlement/Defer",
            );
            let codec = tonic::codec::ProstCodec::default();
            self.inner
                .unary(request.into_request(), path, codec)
                .await
        }

        pub async fn renew_message_lock(
            &mut self,
            request: impl tonic::IntoRequest<super::LockTokenRequest>,
        ) -> Result<tonic::Response<super::RenewMessageLockResponse>, tonic::Status> {
            self.ready().await?;
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/azurefunctions.extensions.servicebus.settlement.Settlement/RenewMessageLock",
            );
            let codec = tonic::codec::ProstCodec::default();
            self.inner
                .unary(request.into_request(), path, codec)
                .await
        }

        pub async fn set_session_state(
            &mut self,
            request: impl tonic::IntoRequest<super::SetSessionStateRequest>,
        ) -> Result<tonic::Response<super::Empty>, tonic::Status> {
            self.ready().await?;
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/azurefunctions.extensions.servicebus.settlement.Settlement/SetSessionState",
            );
            let codec = tonic::codec::ProstCodec::default();
            self.inner
                .unary(request.into_request(), path, codec)
                .await
        }

        pub async fn release_session(
            &mut self,
            request: impl tonic::IntoRequest<super::SessionRequest>,
        ) -> Result<tonic::Response<super::Empty>, tonic::Status> {
            self.ready().await?;
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/azurefunctions.extensions.servicebus.settlement.Settlement/ReleaseSession",
            );
            let codec = tonic::codec::ProstCodec::default();
            self.inner
                .unary(request.into_request(), path, codec)
                .await
        }

        pub async fn renew_session_lock(
            &mut self,
            request: impl tonic::IntoRequest<super::SessionRequest>,
        ) -> Result<tonic::Response<super::RenewSessionLockResponse>, tonic::Status> {
            self.ready().await?;
            let path = tonic::codegen::http::uri::PathAndQuery::from_static(
                "/azurefunctions.extensions.servicebus.settlement.Settlement/RenewSessionLock",
            );
            let codec = tonic::codec::ProstCodec::default();
            self.inner
                .unary(request.into_request(), path, codec)
                .await
        }
    }
}
