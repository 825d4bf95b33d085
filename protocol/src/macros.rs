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

/// Declare a closed enum that travels as a string token on the wire.
///
/// The generated type serializes as its token and only deserializes from
/// one of the declared tokens. Matching is exact, any other value is an
/// error.
///
/// ```
/// reqapi_protocol::wire_enum! {
///     /// Where a message ends up.
///     pub enum Target {
///         Queue = "queue",
///         Topic = "topic",
///     }
/// }
///
/// assert_eq!(Target::Queue.as_str(), "queue");
/// assert_eq!("topic".parse::<Target>().unwrap(), Target::Topic);
/// assert!("Topic".parse::<Target>().is_err());
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $token:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every known value, in declaration order.
            pub const VALUES: &'static [$name] = &[$($name::$variant),+];

            /// The wire token of this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::UnknownVariant;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    _ => Err($crate::UnknownVariant::new(stringify!($name), s)),
                }
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let token = <::std::string::String as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                token
                    .parse()
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }
    };
}

/// Declare the error enum of a service.
///
/// Each variant is matched by its error code and carries the full
/// [`ServiceFault`](crate::ServiceFault). Codes that aren't listed land in
/// the generated `Unknown` variant.
#[macro_export]
macro_rules! service_error {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq)]
        #[non_exhaustive]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant($crate::ServiceFault),
            )+
            /// An error code this client doesn't know about.
            Unknown($crate::ServiceFault),
        }

        impl $name {
            /// The fault this error was built from.
            pub fn fault(&self) -> &$crate::ServiceFault {
                match self {
                    $($name::$variant(fault) => fault,)+
                    $name::Unknown(fault) => fault,
                }
            }

            /// Error code reported by the service.
            pub fn code(&self) -> &str {
                &self.fault().code
            }

            /// Message reported by the service.
            pub fn message(&self) -> Option<&str> {
                self.fault().message.as_deref()
            }

            /// How long the service asked the caller to wait, if it did.
            pub fn retry_after(&self) -> Option<::std::time::Duration> {
                self.fault().retry_after
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(self.fault(), f)
            }
        }

        impl ::std::error::Error for $name {}

        impl $crate::FromFault for $name {
            fn from_fault(fault: $crate::ServiceFault) -> Self {
                match fault.code.as_str() {
                    $($code => $name::$variant(fault),)+
                    _ => $name::Unknown(fault),
                }
            }
        }
    };
}
