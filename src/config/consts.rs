/// Extension appended to template names that have none
pub const DEFAULT_TEMPLATE_EXT: &str = ".jade";
/// Suffix of the fixture file a stubbed call falls back to: `<nodule name>.stub.json`
pub const STUB_FILE_SUFFIX: &str = ".stub.json";
/// Prefix of generated namespace keys (`data1`, `data2`, ...)
pub const DEFAULT_NAMESPACE_PREFIX: &str = "data";
/// Namespace whose body becomes the render data when a nodule sets none
pub const DEFAULT_RENDER_NAMESPACE: &str = "data1";
/// Requests and routes under this prefix answer with JSON by convention
pub const JSON_PATH_PREFIX: &str = "/json/";
/// Route param appended to API paths that end with a slash
pub const ID_PARAM: &str = "id";
