use std::error::Error as StdError;
use std::fmt::Debug;
use std::io::{self, stdout, BufWriter};
use std::path::PathBuf;
use std::result::Result as StdResult;
use std::str::FromStr;

use arrayvec::ArrayVec;
use structopt::StructOpt;

use crate::defs::{Error, ErrorKind::*, Result};
use crate::util::fs;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Array<T: FromStr, const N: usize>(pub [T; N]);

impl<T: Debug + Default + FromStr, const N: usize> FromStr for Array<T, N> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed_err = || {
            let desc = format!("malformed value array '{}'", s);
            Error::new(MalformedData, desc)
        };

        let parse = |iter: &mut std::str::Split<char>| {
            let part = iter.next().ok_or_else(malformed_err)?;
            if part.is_empty() {
                Ok(T::default())
            } else {
                part.trim().parse::<T>().map_err(|_| malformed_err())
            }
        };

        let mut iter = s.split(',');
        let mut vec = ArrayVec::<T, N>::new();

        for _ in 0..N {
            vec.push(parse(&mut iter)?);
        }

        if iter.next().is_some() {
            return Err(malformed_err());
        }

        vec.into_inner().map(Array).map_err(|_| malformed_err())
    }
}

impl<T: FromStr, const N: usize> From<[T; N]> for Array<T, N> {
    fn from(array: [T; N]) -> Self {
        Self(array)
    }
}

pub fn parse_key_val<T, U>(s: &str) -> StdResult<(T, U), Box<dyn StdError>>
where
    T: FromStr,
    T::Err: StdError + 'static,
    U: FromStr,
    U::Err: StdError + 'static,
{
    let err_func = || format!("malformed 'key=value' pair '{}'", s);
    let pos = s.find('=').ok_or_else(err_func)?;
    Ok((s[..pos].parse()?, s[pos + 1..].parse()?))
}

#[macro_export]
macro_rules! define_raw_output {
    ($name: ident, $ext: expr) => {
        #[derive(structopt::StructOpt)]
        pub struct $name {
            #[structopt(
                help = concat!("Output .", $ext, " file (STDOUT if omitted)"),
                long = "out-file",
                short = "o"
            )]
            pub path: Option<std::path::PathBuf>,
        }

        impl $name {
            pub fn get(
                &self,
            ) -> $crate::defs::Result<Box<dyn std::io::Write>> {
                $crate::util::cli::raw_output(&self.path)
            }
        }
    };
}

pub fn raw_output(path: &Option<PathBuf>) -> Result<Box<dyn io::Write>> {
    Ok(if let Some(path) = path {
        let writer = BufWriter::new(fs::create_file(path)?);
        Box::new(writer) as Box<dyn io::Write>
    } else {
        Box::new(stdout()) as Box<dyn io::Write>
    })
}

#[derive(StructOpt)]
pub struct Verbosity {
    #[structopt(help = "Log debug messages", long, short = "v")]
    pub verbose: bool,
}
