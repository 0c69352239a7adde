//! Bounded oscillators: RSI and rolling z-score

/// Variance floor applied before taking the z-score square root
const VARIANCE_FLOOR: f64 = 1e-12;

/// Relative strength index with Wilder smoothing
///
/// Indices up to and including `n - 1` are 0. When the average loss is zero
/// the RS term collapses to 0 as well, so a window with no down moves
/// reports 0 rather than 100.
pub fn rsi(closes: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; closes.len()];
    if n == 0 || closes.is_empty() {
        return out;
    }

    let period = n as f64;
    let mut gain = 0.0;
    let mut loss = 0.0;
    for i in 1..closes.len() {
        let d = closes[i] - closes[i - 1];
        let (up, down) = if d > 0.0 { (d, 0.0) } else { (0.0, -d) };

        if i <= n {
            gain += up;
            loss += down;
            if i == n {
                gain /= period;
                loss /= period;
                out[i] = rsi_value(gain, loss);
            }
        } else {
            gain = (gain * (period - 1.0) + up) / period;
            loss = (loss * (period - 1.0) + down) / period;
            out[i] = rsi_value(gain, loss);
        }
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss != 0.0 {
        avg_gain / avg_loss
    } else {
        0.0
    };
    100.0 - 100.0 / (1.0 + rs)
}

/// Rolling z-score of each close against its trailing `n`-close window
///
/// Indices before the first full window are 0.
pub fn zscore(closes: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; closes.len()];
    if n <= 1 {
        return out;
    }

    let period = n as f64;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for (i, &x) in closes.iter().enumerate() {
        sum += x;
        sum_sq += x * x;
        if i >= n {
            let y = closes[i - n];
            sum -= y;
            sum_sq -= y * y;
        }
        if i + 1 >= n {
            let mean = sum / period;
            let variance = sum_sq / period - mean * mean;
            out[i] = (x - mean) / variance.max(VARIANCE_FLOOR).sqrt();
        }
    }
    out
}
