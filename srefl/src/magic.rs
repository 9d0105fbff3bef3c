/// Name of the environment variable holding the path to a TOML [`RegistryConfig`](crate::utils::conf::RegistryConfig).
pub const ENV_CONFIG_PATH: &str = "SREFL_CONFIG_PATH";

/// Function every registered type receives, returning its own [`TypeRef`](crate::types::TypeRef).
pub const GET_STATIC_TYPE_FN_NAME: &str = "GetStaticType";

/// Name given to the implicit receiver parameter of methods.
pub const RECEIVER_PARAM_NAME: &str = "self";

/// Names of the synthesized accessors of properties and fields.
pub const GETTER_FN_NAME: &str = "Getter";
pub const SETTER_FN_NAME: &str = "Setter";
