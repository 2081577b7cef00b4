//! Read lircd.conf files, which describe infrared remotes and the codes of their buttons.
//!
//! ```
//! let conf = "
//! begin remote
//!   name  tv
//!   bits  8
//!   begin codes
//!     power 0x1
//!   end codes
//! end remote
//! ";
//!
//! let remotes = lircconf::lircd_conf::parse_reader(conf.as_bytes(), "tv.lircd.conf", false)
//!     .expect("parse should succeed");
//!
//! assert_eq!(remotes[0].name, "tv");
//! assert_eq!(remotes[0].commands[0].name, "power");
//! ```

pub mod lircd_conf;
