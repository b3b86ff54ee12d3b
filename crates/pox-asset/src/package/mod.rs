// Manifest conversion
//
// Turns a package.json or bower.json document into a Composer package,
// translating every dependency through the dependency resolver and the
// range converter.

mod convert;
pub mod npm;

pub use convert::{ConvertedPackage, PackageConverter};
pub use npm::Author;
