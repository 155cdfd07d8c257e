//! 反应速率。

use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// 速率字面量解析错误。
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseRateError {
    #[error("`{0}` is not a decimal number")]
    Invalid(String),

    #[error("`{0}` has too many digits")]
    TooLong(String),

    #[error("rate must be positive")]
    Zero,
}

/// 精确的十进制正数，值为 `digits / 10^scale`。
///
/// 总是规范化（小数部分没有末尾的零），所以结构相等即数值相等。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rate {
    digits: u128,
    scale: u32,
}

impl Rate {
    /// 速率 1。
    pub const ONE: Rate = Rate {
        digits: 1,
        scale: 0,
    };

    fn normalized(mut digits: u128, mut scale: u32) -> Self {
        while scale > 0 && digits % 10 == 0 {
            digits /= 10;
            scale -= 1;
        }
        Self { digits, scale }
    }

    /// 精确乘法，溢出时返回 `None`。
    pub fn checked_mul(self, other: Rate) -> Option<Rate> {
        let digits = self.digits.checked_mul(other.digits)?;
        let scale = self.scale.checked_add(other.scale)?;
        // 10^scale 必须仍可表示
        10u128.checked_pow(scale)?;
        Some(Self::normalized(digits, scale))
    }
}

impl FromStr for Rate {
    type Err = ParseRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (int, frac) = s.split_once('.').unwrap_or((s, ""));
        let well_formed = !int.is_empty()
            && int.bytes().all(|b| b.is_ascii_digit())
            && frac.bytes().all(|b| b.is_ascii_digit())
            && !(s.contains('.') && frac.is_empty());
        if !well_formed {
            return Err(ParseRateError::Invalid(s.to_string()));
        }

        let too_long = || ParseRateError::TooLong(s.to_string());
        let scale = u32::try_from(frac.len()).map_err(|_| too_long())?;
        10u128.checked_pow(scale).ok_or_else(too_long)?;
        let digits = format!("{int}{frac}")
            .parse::<u128>()
            .map_err(|_| too_long())?;
        if digits == 0 {
            return Err(ParseRateError::Zero);
        }
        Ok(Self::normalized(digits, scale))
    }
}

impl Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}", self.digits);
        }
        let digits = format!("{:0>width$}", self.digits, width = scale + 1);
        let (int, frac) = digits.split_at(digits.len() - scale);
        write!(f, "{int}.{frac}")
    }
}
